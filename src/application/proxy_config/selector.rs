//! Reverse-Proxy Configuration Selector
//!
//! Renders the variant matching the certificate state and installs it only
//! when it differs from what is on disk. A configuration the proxy rejects
//! is never left installed.

use std::path::{Path, PathBuf};

use crate::config::ProxySettings;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{FileSystem, ProxyController, ProxyError, ReloadOutcome};
use crate::domain::services::Differ;
use crate::domain::value_objects::{ContentHash, DomainSet, ProxyVariant};
use crate::error::DeployError;

use super::templates::{is_managed, Template};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyApplyOutcome {
    pub variant: ProxyVariant,
    /// Whether anything on disk changed
    pub changed: bool,
    pub path: PathBuf,
    /// Fragments removed from the sites directory
    pub retired: Vec<PathBuf>,
    /// `None` when nothing changed and no reload was sent
    pub reload: Option<ReloadOutcome>,
    /// Line diff summary against the previous installation (`+N, -M`)
    pub diff_summary: String,
    pub hash: ContentHash,
}

/// A file removed during apply, kept for restoring
struct RetiredFragment {
    path: PathBuf,
    content: String,
}

pub struct ProxyConfigSelector<'a> {
    fs: &'a dyn FileSystem,
    proxy: &'a dyn ProxyController,
    settings: &'a ProxySettings,
}

impl<'a> ProxyConfigSelector<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        proxy: &'a dyn ProxyController,
        settings: &'a ProxySettings,
    ) -> Self {
        Self {
            fs,
            proxy,
            settings,
        }
    }

    /// Render `secured` when a certificate is present, else `plain`
    pub fn render(
        &self,
        covered: &DomainSet,
        cert_present: bool,
    ) -> Result<(ProxyVariant, String), DeployError> {
        let variant = ProxyVariant::for_certificate(cert_present);
        let template = Template::load(self.fs, &self.settings.templates, variant)?;
        Ok((variant, template.render(covered, self.settings)?))
    }

    pub fn apply(
        &self,
        covered: &DomainSet,
        cert_present: bool,
        capability: &RuntimeCapability,
    ) -> Result<ProxyApplyOutcome, DeployError> {
        let (variant, rendered) = self.render(covered, cert_present)?;
        let path = self.settings.installed_path();
        let hash = ContentHash::from_content(&rendered);

        let installed = self.fs.read_optional(&path)?;
        let retired = self.retired_fragments(&path)?;

        if installed.as_deref() == Some(rendered.as_str()) && retired.is_empty() {
            tracing::info!(%variant, path = %path.display(), "proxy configuration unchanged");
            return Ok(ProxyApplyOutcome {
                variant,
                changed: false,
                path,
                retired: Vec::new(),
                reload: None,
                diff_summary: "+0, -0".to_string(),
                hash,
            });
        }

        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.settings.site_name.clone());
        let diff = Differ::new().diff(installed.as_deref(), &rendered, &label);
        tracing::debug!(diff = %diff.unified, "proxy configuration diff");

        self.fs.write(&path, &rendered)?;
        for fragment in &retired {
            if let Err(e) = self.fs.remove(&fragment.path) {
                self.restore(&path, installed.as_deref(), &retired);
                return Err(e.into());
            }
        }

        if let Err(e) = self.proxy.validate(capability) {
            self.restore(&path, installed.as_deref(), &retired);
            return Err(match e {
                ProxyError::Invalid(output) => DeployError::ConfigValidationFailed { output },
                other => DeployError::ProxyControlFailed {
                    action: "validate",
                    reason: other.to_string(),
                },
            });
        }

        let reload = self
            .proxy
            .reload(capability)
            .map_err(|e| DeployError::ProxyControlFailed {
                action: "reload",
                reason: e.to_string(),
            })?;

        tracing::info!(
            %variant,
            path = %path.display(),
            hash = %hash.short(),
            changes = %diff.summary(),
            retired = retired.len(),
            "proxy configuration installed"
        );

        Ok(ProxyApplyOutcome {
            variant,
            changed: true,
            path,
            retired: retired.into_iter().map(|f| f.path).collect(),
            reload: Some(reload),
            diff_summary: diff.summary(),
            hash,
        })
    }

    /// Other managed fragments in the sites directory, plus explicitly retired names
    fn retired_fragments(&self, installed: &Path) -> Result<Vec<RetiredFragment>, DeployError> {
        let mut fragments = Vec::new();
        for path in self.fs.list_files(&self.settings.sites_dir)? {
            if path == installed || path.extension().map_or(true, |ext| ext != "conf") {
                continue;
            }
            let listed = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| self.settings.retire.iter().any(|r| r == name));

            let content = if listed {
                self.fs.read(&path)?
            } else {
                match self.fs.read(&path) {
                    Ok(content) if is_managed(&content) => content,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "unreadable fragment treated as unmanaged");
                        continue;
                    }
                }
            };
            tracing::debug!(path = %path.display(), "retiring proxy fragment");
            fragments.push(RetiredFragment { path, content });
        }
        Ok(fragments)
    }

    /// Put back what `apply` replaced; failures are logged, the caller's error wins
    fn restore(&self, path: &Path, previous: Option<&str>, retired: &[RetiredFragment]) {
        let result = match previous {
            Some(content) => self.fs.write(path, content),
            None => match self.fs.remove(path) {
                Err(e) if e.is_not_found() => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            tracing::error!(path = %path.display(), error = %e, "failed to restore previous proxy configuration");
        }

        for fragment in retired {
            if let Err(e) = self.fs.write(&fragment.path, &fragment.content) {
                tracing::error!(path = %fragment.path.display(), error = %e, "failed to restore retired proxy fragment");
            }
        }
    }
}
