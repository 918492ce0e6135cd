//! Application configuration.
//!
//! Loaded with figment from, in order of precedence (highest first):
//! 1. Environment variables prefixed with `POS_`
//! 2. A TOML file (`pos.toml` in the working directory by default)
//! 3. Default values

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{PosError, Result};

const CONFIG_FILE_NAME: &str = "pos.toml";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DATABASE_FILE: &str = "pos_store.db";
const DEFAULT_NAMESPACE: &str = "pos";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the store database and logs.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub database_file: String,
    /// Key prefix for every collection in the store.
    pub namespace: String,
    /// Seed the demo account and catalog when the store has no users.
    pub seed_demo_data: bool,
    /// Overrides the default tracing filter.
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            seed_demo_data: true,
            log_filter: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Load with an explicit TOML path. A missing file is not an error.
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("POS_"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Load for the desktop shell: `data_dir` defaults to the platform app
    /// data directory unless the file or environment overrides it.
    pub fn load_with_data_dir(app_data_dir: &Path) -> Result<Self> {
        let defaults = AppConfig {
            data_dir: app_data_dir.to_path_buf(),
            ..AppConfig::default()
        };
        let config_file = app_data_dir.join(CONFIG_FILE_NAME);

        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(defaults))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("POS_"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(PosError::validation("namespace must not be empty"));
        }
        if self.namespace.chars().any(char::is_whitespace) {
            return Err(PosError::validation("namespace must not contain whitespace"));
        }
        if self.database_file.trim().is_empty() {
            return Err(PosError::validation("database_file must not be empty"));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
