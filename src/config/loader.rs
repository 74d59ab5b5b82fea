//! Configuration loading
//!
//! Resolution order (first hit wins for the file):
//! 1. `--config <PATH>`
//! 2. `./berth.toml`
//! 3. `$XDG_CONFIG_HOME/berth/config.toml` (or the platform config dir)
//! 4. Built-in defaults
//!
//! Environment variables (`BERTH_*`) are applied on top of whichever source won.

use std::fs;
use std::path::{Path, PathBuf};

use super::env_validator::{suggest, EnvVarValidator};
use super::types::{Config, ProxyMode};
use super::ConfigError;
use crate::domain::value_objects::StrategySelection;

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "berth.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: {}", file.display(), line, self.message),
            (Some(file), None) => write!(f, "{}: {}", file.display(), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// A loaded configuration plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
    /// Directory relative paths are resolved against
    pub base_dir: PathBuf,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        file: path.to_path_buf(),
        source,
    })?;
    parse_with_warnings(&content, Some(path))
}

/// Parse TOML text, collecting unknown keys as warnings
pub fn parse_with_warnings(
    content: &str,
    path: Option<&Path>,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        file: path.map(Path::to_path_buf),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            let hint = suggest(&key, KNOWN_KEYS)
                .map(|s| format!(" (did you mean '{}'?)", s))
                .unwrap_or_default();
            ConfigWarning {
                message: format!("unknown config key '{}'{}", path_str, hint),
                line: find_line_number(content, &key),
                file: path.map(Path::to_path_buf),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Locate and load the configuration, then apply environment overrides
pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<LoadedConfig, ConfigError> {
    load_from(explicit, cwd, user_config_path(), |key| std::env::var(key).ok())
}

pub(crate) fn load_from(
    explicit: Option<&Path>,
    cwd: &Path,
    user_config: Option<PathBuf>,
    get_env: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, ConfigError> {
    let source = match explicit {
        Some(path) => {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            Some(path)
        }
        None => {
            let project = cwd.join(PROJECT_CONFIG_FILE);
            if project.exists() {
                Some(project)
            } else {
                user_config.filter(|p| p.exists())
            }
        }
    };

    let (config, mut warnings) = match &source {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            load_with_warnings(path)?
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            (Config::default(), Vec::new())
        }
    };

    let (config, env_warnings) = with_env_overrides(config, get_env);
    warnings.extend(env_warnings);

    let base_dir = source
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());

    Ok(LoadedConfig {
        config,
        source,
        base_dir,
        warnings,
    })
}

/// Apply environment variable overrides (BERTH_* prefix)
pub fn with_env_overrides(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<ConfigWarning>) {
    let mut warnings = Vec::new();
    let mut warn = |key: &str, message: String| {
        warnings.push(ConfigWarning {
            key: key.to_string(),
            file: None,
            line: None,
            message,
        })
    };

    if let Some(domain) = get_env("BERTH_DOMAIN").filter(|v| !v.trim().is_empty()) {
        config.domain = Some(domain);
    }

    if let Some(email) = get_env("BERTH_EMAIL").filter(|v| !v.trim().is_empty()) {
        config.email = Some(email);
    }

    // Comma-separated; an empty value disables aliases
    if let Some(aliases) = get_env("BERTH_ALIASES") {
        config.aliases = Some(
            aliases
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        );
    }

    if let Some(value) = get_env("BERTH_RUNTIME_STRATEGY") {
        let validator =
            EnvVarValidator::new("BERTH_RUNTIME_STRATEGY", StrategySelection::VALID_VALUES);
        match validator.parse(&value, StrategySelection::parse) {
            Ok(strategy) => config.runtime.strategy = strategy,
            Err(message) => warn("BERTH_RUNTIME_STRATEGY", message),
        }
    }

    if let Some(value) = get_env("BERTH_PROXY_MODE") {
        let validator = EnvVarValidator::new("BERTH_PROXY_MODE", ProxyMode::VALID_VALUES);
        match validator.parse(&value, ProxyMode::parse) {
            Ok(mode) => config.proxy.mode = mode,
            Err(message) => warn("BERTH_PROXY_MODE", message),
        }
    }

    if let Some(value) = get_env("BERTH_CERT_STAGING") {
        let validator = EnvVarValidator::new("BERTH_CERT_STAGING", &["true", "false", "1", "0"]);
        match validator.parse(&value, parse_bool) {
            Ok(staging) => config.certificates.staging = staging,
            Err(message) => warn("BERTH_CERT_STAGING", message),
        }
    }

    (config, warnings)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// User-level config file location
fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("berth").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

const KNOWN_KEYS: &[&str] = &[
    "domain",
    "email",
    "aliases",
    "runtime",
    "program",
    "group",
    "strategy",
    "probe_timeout_secs",
    "certificates",
    "dir",
    "work_dir",
    "image",
    "staging",
    "timeout_secs",
    "proxy",
    "mode",
    "sites_dir",
    "site_name",
    "upstream",
    "certificate_root",
    "retire",
    "templates",
    "plain",
    "secured",
    "container",
    "validate_command",
    "reload_command",
    "stop_command",
    "start_command",
    "status_command",
    "app",
    "compose_file",
    "project_name",
    "env_file",
    "pull",
    "teardown_timeout_secs",
    "build_timeout_secs",
    "start_timeout_secs",
];
