use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};

pub fn ensure_output_dir(output_dir: &Path) -> std::io::Result<PathBuf> {
    ensure_dir(output_dir)?;
    Ok(output_dir.to_path_buf())
}

/// Write one generated page into the output directory
pub fn write_page(output_dir: &Path, page_name: &str, html: &str) -> Result<PathBuf> {
    let path = output_dir.join(page_name);
    fs::write(&path, html).map_err(|e| {
        AppError::IoError(format!("Failed to write {}: {}", path.display(), e))
    })?;
    Ok(path)
}

/// CSV files directly inside `dir`, sorted by name
pub fn list_csv_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AppError::IoError(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.to_ascii_lowercase().ends_with(".csv") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
