// ============================================================
// INDEX PAGE USE CASE
// ============================================================
// Load the manifest and list every CSV page it names

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::error::{AppError, Result};
use crate::domain::manifest::Manifest;
use crate::infrastructure::fetchers::ResourceFetcher;
use crate::shared::html::{error_paragraph, escape, PageChrome};

pub const REMEDIATION: &str = "Run `csvdeck manifest` to generate it.";

/// Fetch and parse the manifest
pub async fn load_manifest(
    fetcher: &Arc<dyn ResourceFetcher>,
    manifest_file: &str,
) -> Result<Manifest> {
    let location = fetcher.locate(manifest_file);

    let bytes = fetcher.fetch_bytes(manifest_file).await.map_err(|err| {
        error!(error = %err, resource = %location, "Error loading CSV file list");
        err
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let manifest = Manifest::from_json(&text).map_err(|err| {
        error!(error = %err, resource = %location, "Malformed CSV file list");
        let detail = match err {
            AppError::ParseError(msg) => msg,
            other => other.to_string(),
        };
        AppError::ParseError(format!("{} is not a valid manifest: {}", manifest_file, detail))
    })?;

    info!(resource = %location, files = manifest.len(), "Loaded CSV file list");
    Ok(manifest)
}

/// The `<ul>` of page links, or a hint when the manifest is empty
pub fn render_file_list(manifest: &Manifest) -> String {
    if manifest.is_empty() {
        return "<p>No CSV files found. Run `csvdeck manifest`.</p>".to_string();
    }

    let items: Vec<String> = manifest
        .entries
        .iter()
        .map(|entry| {
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                escape(&entry.page_name()),
                escape(&entry.display_title())
            )
        })
        .collect();

    format!("<ul>\n{}\n</ul>", items.join("\n"))
}

pub fn render_index_page(manifest: &Manifest, chrome: &PageChrome) -> String {
    chrome.document(&chrome.site_title, &render_file_list(manifest), false)
}

/// Index page shown when the manifest could not be loaded
pub fn render_index_error(err: &AppError, manifest_file: &str, chrome: &PageChrome) -> String {
    let message = format!(
        "Error loading CSV file list: {}. Please ensure '{}' exists and is correctly formatted. {}",
        err, manifest_file, REMEDIATION
    );
    chrome.document(&chrome.site_title, &error_paragraph(&message), false)
}
