use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::Serialize;
use validator::Validate;

use crate::domain::app_config::AppConfig;
use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "csvdeck.toml";
pub const ENV_PREFIX: &str = "CSVDECK_";

/// Values given on the command line; unset fields leave lower layers alone
#[derive(Debug, Default, Clone, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Layers defaults, the TOML file, `CSVDECK_*` variables and CLI overrides
pub struct ConfigService {
    config_file: PathBuf,
    explicit: bool,
}

impl ConfigService {
    pub fn new(config_file: Option<&Path>) -> Self {
        match config_file {
            Some(path) => Self {
                config_file: path.to_path_buf(),
                explicit: true,
            },
            None => Self {
                config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
                explicit: false,
            },
        }
    }

    pub fn figment(&self, overrides: &ConfigOverrides) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(&self.config_file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    pub fn load(&self, overrides: &ConfigOverrides) -> Result<AppConfig> {
        // The default file is optional, a file named on the command line is not
        if self.explicit && !self.config_file.exists() {
            return Err(AppError::ConfigError(format!(
                "Config file {} does not exist",
                self.config_file.display()
            )));
        }

        let config: AppConfig = self
            .figment(overrides)
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid configuration: {}", e)))?;

        Ok(config)
    }
}
