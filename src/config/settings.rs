//! Resolved deployment settings
//!
//! `Config` is what the operator wrote; `DeploySettings` is what a run uses:
//! validated domains, absolute paths, and timeouts as `Duration`s.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{Config, ProxyMode};
use super::ConfigError;
use crate::domain::value_objects::{DomainSet, StrategySelection};

/// Where certificates live inside the certbot container
pub const CONTAINER_CERT_ROOT: &str = "/etc/letsencrypt";
/// Where certbot keeps its working state inside the container
pub const CONTAINER_WORK_DIR: &str = "/var/lib/letsencrypt";

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub program: String,
    pub group: String,
    pub selection: StrategySelection,
    pub probe_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateSettings {
    pub dir: PathBuf,
    pub work_dir: PathBuf,
    pub image: String,
    pub staging: bool,
    pub timeout: Duration,
}

impl CertificateSettings {
    /// Artifact whose presence means "a certificate exists"
    pub fn artifact_path(&self, primary: &str) -> PathBuf {
        self.dir.join("live").join(primary).join("fullchain.pem")
    }
}

/// Template sources; `None` selects the built-in template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSources {
    pub plain: Option<PathBuf>,
    pub secured: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxySettings {
    pub mode: ProxyMode,
    pub sites_dir: PathBuf,
    pub site_name: String,
    pub upstream: String,
    /// Certificate root as seen by the proxy process
    pub certificate_root: String,
    pub retire: Vec<String>,
    pub templates: TemplateSources,
    pub image: String,
    pub container: String,
    pub validate_command: Vec<String>,
    pub reload_command: Vec<String>,
    pub stop_command: Option<Vec<String>>,
    pub start_command: Option<Vec<String>>,
    /// Empty means "assume running"
    pub status_command: Vec<String>,
    pub timeout: Duration,
}

impl ProxySettings {
    /// The installed configuration file
    pub fn installed_path(&self) -> PathBuf {
        self.sites_dir.join(format!("{}.conf", self.site_name))
    }

    /// Host part of the upstream address (`app` in `app:8000`)
    pub fn upstream_host(&self) -> &str {
        self.upstream
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or(&self.upstream)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub compose_file: PathBuf,
    pub project_name: Option<String>,
    pub env_file: Option<PathBuf>,
    pub pull: bool,
    pub teardown_timeout: Duration,
    pub build_timeout: Duration,
    pub start_timeout: Duration,
}

/// Everything one deployment run needs
#[derive(Debug, Clone, PartialEq)]
pub struct DeploySettings {
    pub domains: DomainSet,
    pub email: String,
    pub runtime: RuntimeSettings,
    pub certificates: CertificateSettings,
    pub proxy: ProxySettings,
    pub app: AppSettings,
}

impl DeploySettings {
    /// Validate `config`, resolving relative paths against `base_dir`
    pub fn resolve(config: &Config, base_dir: &Path) -> Result<Self, ConfigError> {
        let domain = config
            .domain
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "domain",
                env: "BERTH_DOMAIN",
            })?;

        let email = config
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::Missing {
                key: "email",
                env: "BERTH_EMAIL",
            })?;
        validate_email(email)?;

        let primary = crate::domain::value_objects::normalize_hostname(domain).map_err(|source| {
            ConfigError::InvalidDomain {
                key: "domain",
                source,
            }
        })?;
        let aliases = config
            .aliases
            .clone()
            .unwrap_or_else(|| vec![format!("www.{}", primary)]);
        let domains = DomainSet::new(&primary, &aliases).map_err(|source| {
            ConfigError::InvalidDomain {
                key: "aliases",
                source,
            }
        })?;

        require_positive("runtime.probe_timeout_secs", config.runtime.probe_timeout_secs)?;
        require_positive("certificates.timeout_secs", config.certificates.timeout_secs)?;
        require_positive("proxy.timeout_secs", config.proxy.timeout_secs)?;
        require_positive("app.teardown_timeout_secs", config.app.teardown_timeout_secs)?;
        require_positive("app.build_timeout_secs", config.app.build_timeout_secs)?;
        require_positive("app.start_timeout_secs", config.app.start_timeout_secs)?;

        if config.runtime.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "runtime.program",
                message: "must not be empty".to_string(),
            });
        }

        let certificates = CertificateSettings {
            dir: absolutize(base_dir, &config.certificates.dir),
            work_dir: absolutize(base_dir, &config.certificates.work_dir),
            image: config.certificates.image.clone(),
            staging: config.certificates.staging,
            timeout: Duration::from_secs(config.certificates.timeout_secs),
        };

        let proxy = resolve_proxy(config, base_dir, domains.primary(), &certificates)?;

        let app = AppSettings {
            compose_file: absolutize(base_dir, &config.app.compose_file),
            project_name: config.app.project_name.clone(),
            env_file: config.app.env_file.as_deref().map(|p| absolutize(base_dir, p)),
            pull: config.app.pull,
            teardown_timeout: Duration::from_secs(config.app.teardown_timeout_secs),
            build_timeout: Duration::from_secs(config.app.build_timeout_secs),
            start_timeout: Duration::from_secs(config.app.start_timeout_secs),
        };

        Ok(Self {
            domains,
            email: email.to_string(),
            runtime: RuntimeSettings {
                program: config.runtime.program.clone(),
                group: config.runtime.group.clone(),
                selection: config.runtime.strategy,
                probe_timeout: Duration::from_secs(config.runtime.probe_timeout_secs),
            },
            certificates,
            proxy,
            app,
        })
    }
}

fn resolve_proxy(
    config: &Config,
    base_dir: &Path,
    primary: &str,
    certificates: &CertificateSettings,
) -> Result<ProxySettings, ConfigError> {
    let proxy = &config.proxy;

    let site_name = proxy
        .site_name
        .clone()
        .unwrap_or_else(|| primary.to_string());
    if site_name.is_empty() || site_name.contains('/') || site_name.starts_with('.') {
        return Err(ConfigError::InvalidValue {
            key: "proxy.site_name",
            message: format!("'{}' is not a plain file name", site_name),
        });
    }

    if proxy.upstream.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "proxy.upstream",
            message: "must not be empty".to_string(),
        });
    }

    if proxy.mode == ProxyMode::Host {
        for (key, command) in [
            ("proxy.validate_command", &proxy.validate_command),
            ("proxy.reload_command", &proxy.reload_command),
        ] {
            if command.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key,
                    message: "must name a program in host mode".to_string(),
                });
            }
        }
    }

    let certificate_root = proxy.certificate_root.clone().unwrap_or_else(|| match proxy.mode {
        ProxyMode::Container => CONTAINER_CERT_ROOT.to_string(),
        ProxyMode::Host => certificates.dir.display().to_string(),
    });

    Ok(ProxySettings {
        mode: proxy.mode,
        sites_dir: absolutize(base_dir, &proxy.sites_dir),
        site_name,
        upstream: proxy.upstream.trim().to_string(),
        certificate_root: certificate_root.trim_end_matches('/').to_string(),
        retire: proxy.retire.clone(),
        templates: TemplateSources {
            plain: proxy.templates.plain.as_deref().map(|p| absolutize(base_dir, p)),
            secured: proxy.templates.secured.as_deref().map(|p| absolutize(base_dir, p)),
        },
        image: proxy.image.clone(),
        container: proxy.container.clone(),
        validate_command: proxy.validate_command.clone(),
        reload_command: proxy.reload_command.clone(),
        stop_command: proxy.stop_command.clone().filter(|c| !c.is_empty()),
        start_command: proxy.start_command.clone().filter(|c| !c.is_empty()),
        status_command: proxy.status_command.clone(),
        timeout: Duration::from_secs(proxy.timeout_secs),
    })
}

fn validate_email(email: &str) -> Result<(), ConfigError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "email",
            message: format!("'{}' is not an email address", email),
        })
    }
}

fn require_positive(key: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
