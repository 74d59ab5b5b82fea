//! Configuration type definitions
//!
//! Mirrors the `berth.toml` layout. Every section is optional; missing keys
//! fall back to the defaults below.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::StrategySelection;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Primary domain (required, may come from `BERTH_DOMAIN`)
    pub domain: Option<String>,
    /// Contact email for certificate issuance (required, may come from `BERTH_EMAIL`)
    pub email: Option<String>,
    /// Additional hostnames; `None` means `["www.<domain>"]`
    pub aliases: Option<Vec<String>>,
    pub runtime: RuntimeConfig,
    pub certificates: CertificatesConfig,
    pub proxy: ProxyConfig,
    pub app: AppConfig,
}

/// `[runtime]` - container runtime access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub program: String,
    /// Group used by the group-switch strategy
    pub group: String,
    pub strategy: StrategySelection,
    pub probe_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            group: "docker".to_string(),
            strategy: StrategySelection::Auto,
            probe_timeout_secs: 15,
        }
    }
}

/// `[certificates]` - ACME client (certbot) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificatesConfig {
    /// Host directory mounted as `/etc/letsencrypt`
    pub dir: PathBuf,
    /// Host directory mounted as `/var/lib/letsencrypt`
    pub work_dir: PathBuf,
    pub image: String,
    /// Use the certificate authority's staging environment
    pub staging: bool,
    pub timeout_secs: u64,
}

impl Default for CertificatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("certbot/conf"),
            work_dir: PathBuf::from("certbot/work"),
            image: "certbot/certbot".to_string(),
            staging: false,
            timeout_secs: 300,
        }
    }
}

/// Where the reverse proxy runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    /// nginx is a service of the compose stack
    #[default]
    Container,
    /// nginx is managed by the host (systemd or similar)
    Host,
}

impl ProxyMode {
    pub const VALID_VALUES: &'static [&'static str] = &["container", "host"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "container" => Some(ProxyMode::Container),
            "host" => Some(ProxyMode::Host),
            _ => None,
        }
    }
}

/// `[proxy.templates]` - operator-supplied template files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub plain: Option<PathBuf>,
    pub secured: Option<PathBuf>,
}

/// `[proxy]` - reverse proxy configuration and control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub mode: ProxyMode,
    /// Directory holding the installed site configuration
    pub sites_dir: PathBuf,
    /// File stem of the installed configuration; defaults to the primary domain
    pub site_name: Option<String>,
    /// `host:port` the proxy forwards to
    pub upstream: String,
    /// Certificate root as seen by the proxy process
    pub certificate_root: Option<String>,
    /// Fragment file names to remove from `sites_dir`
    pub retire: Vec<String>,
    pub templates: TemplatesConfig,
    /// Image used to syntax-check the configuration (container mode)
    pub image: String,
    /// Name of the running proxy container (container mode)
    pub container: String,
    /// Host mode commands
    pub validate_command: Vec<String>,
    pub reload_command: Vec<String>,
    pub stop_command: Option<Vec<String>>,
    pub start_command: Option<Vec<String>>,
    /// Exits 0 while the host proxy runs; checked before `stop_command`
    pub status_command: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            mode: ProxyMode::Container,
            sites_dir: PathBuf::from("nginx/conf.d"),
            site_name: None,
            upstream: "app:8000".to_string(),
            certificate_root: None,
            retire: vec!["default.conf".to_string()],
            templates: TemplatesConfig::default(),
            image: "nginx:alpine".to_string(),
            container: "proxy".to_string(),
            validate_command: vec!["nginx".to_string(), "-t".to_string()],
            reload_command: vec!["nginx".to_string(), "-s".to_string(), "reload".to_string()],
            stop_command: None,
            start_command: None,
            status_command: vec![
                "systemctl".to_string(),
                "is-active".to_string(),
                "--quiet".to_string(),
                "nginx".to_string(),
            ],
            timeout_secs: 60,
        }
    }
}

/// `[app]` - the compose stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub compose_file: PathBuf,
    pub project_name: Option<String>,
    /// Secrets file handed to compose untouched
    pub env_file: Option<PathBuf>,
    /// Pull newer base images while building
    pub pull: bool,
    pub teardown_timeout_secs: u64,
    pub build_timeout_secs: u64,
    pub start_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            compose_file: PathBuf::from("docker-compose.yml"),
            project_name: None,
            env_file: None,
            pull: false,
            teardown_timeout_secs: 120,
            build_timeout_secs: 1800,
            start_timeout_secs: 300,
        }
    }
}
