use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct AppConfig {
    /// Directory holding the CSV files and the manifest
    pub source_dir: PathBuf,
    /// When set, CSV files and the manifest are fetched from here instead
    #[validate(url)]
    pub base_url: Option<String>,
    #[validate(length(min = 1))]
    pub manifest_file: String,
    pub output_dir: PathBuf,
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(length(min = 1))]
    pub site_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            base_url: None,
            manifest_file: "csv_files.json".to_string(),
            output_dir: PathBuf::from("site"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            site_title: "CSV Files".to_string(),
        }
    }
}
