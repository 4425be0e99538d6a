pub mod directory;
pub mod http;
pub mod routing;

use std::path::Path;
use std::sync::Arc;

use crate::domain::app_config::AppConfig;
use crate::domain::error::{AppError, Result};
use async_trait::async_trait;
use directory::DirectoryFetcher;
use http::HttpFetcher;
use routing::RoutingFetcher;

/// Reads a named resource (a CSV file or the manifest) in one shot
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch_bytes(&self, name: &str) -> Result<Vec<u8>>;

    /// Human-readable location of `name`, for logs
    fn locate(&self, name: &str) -> String;
}

/// Fetcher for the configured source: HTTP when `base_url` is set, the
/// source directory otherwise. Absolute http(s) URLs are fetched over HTTP
/// in both cases.
pub fn fetcher_from_config(config: &AppConfig) -> Result<Arc<dyn ResourceFetcher>> {
    match config.base_url.as_deref() {
        Some(base_url) => Ok(Arc::new(HttpFetcher::with_base(base_url)?)),
        None => Ok(Arc::new(RoutingFetcher::new(
            Arc::new(DirectoryFetcher::new(config.source_dir.clone())),
            Arc::new(HttpFetcher::new()?),
        ))),
    }
}

/// Fetcher plus resource name for a single path or URL given on the command line
pub fn fetcher_for_source(source: &str) -> Result<(Arc<dyn ResourceFetcher>, String)> {
    if HttpFetcher::is_remote(source) {
        return Ok((Arc::new(HttpFetcher::new()?), source.to_string()));
    }

    let path = Path::new(source);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            AppError::ValidationError(format!("Invalid CSV file name provided: {:?}", source))
        })?
        .to_string();
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok((Arc::new(DirectoryFetcher::new(dir.to_path_buf())), file_name))
}
