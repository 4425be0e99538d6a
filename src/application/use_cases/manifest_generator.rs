// ============================================================
// MANIFEST GENERATOR USE CASE
// ============================================================
// Scan a directory for CSV files and write the manifest the index
// page is built from

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::manifest::{Manifest, ManifestEntry};
use crate::infrastructure::storage::list_csv_files;

/// Write `manifest_file` into `source_dir` listing every CSV file found there.
///
/// With `with_titles` the titled object form is written, keeping any titles
/// an existing manifest already assigns.
pub fn generate_manifest(
    source_dir: &Path,
    manifest_file: &str,
    with_titles: bool,
) -> Result<Manifest> {
    let manifest_path = source_dir.join(manifest_file);
    let existing = if with_titles {
        read_existing(&manifest_path)
    } else {
        Manifest::default()
    };

    let entries = list_csv_files(source_dir)?
        .into_iter()
        .map(|file_name| {
            let title = existing.title_for(&file_name).map(str::to_string);
            ManifestEntry::new(file_name, title)
        })
        .collect();
    let manifest = Manifest::new(entries);

    let json = if with_titles {
        manifest.to_titled_json()?
    } else {
        manifest.to_list_json()?
    };
    fs::write(&manifest_path, json).map_err(|e| {
        AppError::IoError(format!("Failed to write {}: {}", manifest_path.display(), e))
    })?;

    info!(
        manifest = %manifest_path.display(),
        files = manifest.len(),
        titled = with_titles,
        "Wrote CSV file list"
    );
    Ok(manifest)
}

fn read_existing(path: &Path) -> Manifest {
    let Ok(text) = fs::read_to_string(path) else {
        return Manifest::default();
    };
    match Manifest::from_json(&text) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(manifest = %path.display(), error = %err, "Ignoring unreadable manifest");
            Manifest::default()
        }
    }
}
