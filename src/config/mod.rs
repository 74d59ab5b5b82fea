//! Configuration module for Berth
//!
//! Implements the configuration hierarchy:
//! 1. `--config` flag (highest priority)
//! 2. Environment variables (BERTH_*), applied on top of the file
//! 3. Project config (`./berth.toml`)
//! 4. User config (`~/.config/berth/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod settings;
mod types;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::value_objects::DomainError;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    load, load_with_warnings, parse_with_warnings, with_env_overrides, ConfigWarning,
    LoadedConfig, PROJECT_CONFIG_FILE,
};
pub use settings::{
    AppSettings, CertificateSettings, DeploySettings, ProxySettings, RuntimeSettings,
    TemplateSources, CONTAINER_CERT_ROOT, CONTAINER_WORK_DIR,
};
pub use types::{
    AppConfig, CertificatesConfig, Config, ProxyConfig, ProxyMode, RuntimeConfig,
    TemplatesConfig,
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", file.display())]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {message}", file.as_ref().map(|f| f.display().to_string()).unwrap_or_else(|| "config".to_string()))]
    Parse {
        file: Option<PathBuf>,
        message: String,
    },

    #[error("missing '{key}' (set it in berth.toml or via {env})")]
    Missing {
        key: &'static str,
        env: &'static str,
    },

    #[error("invalid '{key}': {source}")]
    InvalidDomain {
        key: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("invalid '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl From<ConfigError> for crate::error::DeployError {
    fn from(err: ConfigError) -> Self {
        crate::error::DeployError::InvalidConfig {
            message: err.to_string(),
        }
    }
}
