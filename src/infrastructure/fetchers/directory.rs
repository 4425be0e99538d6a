use super::ResourceFetcher;
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Reads resources from a local directory
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Relative paths below the root are served (`data/poe.csv`);
    /// `..`, absolute paths and drive prefixes are not
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let mut has_name = false;
        for component in Path::new(name).components() {
            match component {
                Component::Normal(_) => has_name = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    has_name = false;
                    break;
                }
            }
        }

        if has_name {
            Ok(self.root.join(name))
        } else {
            Err(AppError::ValidationError(format!(
                "Invalid CSV file name provided: {:?}",
                name
            )))
        }
    }
}

#[async_trait]
impl ResourceFetcher for DirectoryFetcher {
    async fn fetch_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.resolve(name)?;
        tokio::fs::read(&path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("{} does not exist in {}", name, self.root.display()))
            } else {
                AppError::IoError(format!("Failed to read {}: {}", path.display(), err))
            }
        })
    }

    fn locate(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}
