//! Certificate Lifecycle Manager
//!
//! ```text
//! HasCertificate ──renew-if-due──▶ Covered(existing)   (renewal errors absorbed)
//! NoCertificate ──issue(full)───▶ Covered(full)
//!               └─fail─▶ issue(primary) ──▶ Covered(primary) | Failed
//! ```
//!
//! Never deletes a certificate and never sends more than two issuance
//! requests in one run.

use crate::config::CertificateSettings;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{AcmeClient, FileSystem, FsError, RenewalStatus};
use crate::domain::value_objects::DomainSet;
use crate::error::DeployError;

/// What the manager did this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateAction {
    /// Existing certificate was due and has been renewed
    Renewed,
    /// Existing certificate is not yet due
    RenewalNotDue,
    /// Renewal failed; the existing certificate is still used
    RenewalFailed { reason: String },
    /// A new certificate was issued; `fallback` when aliases were dropped
    Issued { fallback: bool },
}

impl CertificateAction {
    /// Whether the certificate state changed
    pub fn changed(&self) -> bool {
        matches!(
            self,
            CertificateAction::Renewed | CertificateAction::Issued { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateOutcome {
    pub action: CertificateAction,
    /// Domains the certificate is known to cover, primary first
    pub covered: DomainSet,
    /// Whether the certificate artifact exists
    pub present: bool,
    /// Degraded-but-acceptable conditions to surface to the operator
    pub warnings: Vec<String>,
}

pub struct CertificateManager<'a> {
    acme: &'a dyn AcmeClient,
    fs: &'a dyn FileSystem,
    settings: &'a CertificateSettings,
}

impl<'a> CertificateManager<'a> {
    pub fn new(
        acme: &'a dyn AcmeClient,
        fs: &'a dyn FileSystem,
        settings: &'a CertificateSettings,
    ) -> Self {
        Self { acme, fs, settings }
    }

    /// Make sure a certificate exists for `domains`, issuing or renewing it
    pub fn ensure(
        &self,
        domains: &DomainSet,
        email: &str,
        capability: &RuntimeCapability,
    ) -> Result<CertificateOutcome, DeployError> {
        if self.is_present(capability, domains.primary())? {
            Ok(self.maintain(domains, capability))
        } else {
            self.acquire(domains, email, capability)
        }
    }

    /// Whether the certificate artifact for `primary` exists
    ///
    /// The certificate directory is usually root-owned; when it cannot be
    /// inspected locally the check runs inside the runtime instead.
    pub fn is_present(
        &self,
        capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<bool, DeployError> {
        let artifact = self.settings.artifact_path(primary);
        match self.fs.try_exists(&artifact) {
            Ok(present) => Ok(present),
            Err(FsError::PermissionDenied(_)) => {
                tracing::debug!(path = %artifact.display(), "certificate directory not readable; checking through the runtime");
                self.acme
                    .certificate_present(capability, primary)
                    .map_err(|e| DeployError::CertificateAcquisitionFailed {
                        domains: primary.to_string(),
                        reason: format!("cannot check for an existing certificate: {}", e),
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn maintain(&self, domains: &DomainSet, capability: &RuntimeCapability) -> CertificateOutcome {
        let primary = domains.primary();
        let mut warnings = Vec::new();

        let action = match self.acme.renew(capability, primary) {
            Ok(RenewalStatus::Renewed) => {
                tracing::info!(%primary, "certificate renewed");
                CertificateAction::Renewed
            }
            Ok(RenewalStatus::NotDue) => {
                tracing::info!(%primary, "certificate not yet due for renewal");
                CertificateAction::RenewalNotDue
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(%primary, %reason, "certificate renewal failed; keeping the existing certificate");
                warnings.push(format!(
                    "renewal failed, existing certificate kept: {}",
                    reason
                ));
                CertificateAction::RenewalFailed { reason }
            }
        };

        let covered = match self.acme.covered_domains(capability, primary) {
            Ok(Some(listed)) => domains.restricted_to(&listed),
            Ok(None) | Err(_) => {
                tracing::warn!(%primary, "certificate coverage unknown; assuming the primary domain only");
                warnings.push("certificate coverage unknown, assuming the primary domain only".to_string());
                domains.primary_only()
            }
        };

        if !domains.aliases_covered_by(&covered) {
            tracing::info!(covered = %covered, requested = %domains, "existing certificate does not cover every alias");
        }

        CertificateOutcome {
            action,
            covered,
            present: true,
            warnings,
        }
    }

    fn acquire(
        &self,
        domains: &DomainSet,
        email: &str,
        capability: &RuntimeCapability,
    ) -> Result<CertificateOutcome, DeployError> {
        let mut warnings = Vec::new();

        let (covered, fallback) = match self.acme.issue(capability, domains, email) {
            Ok(()) => (domains.clone(), false),
            Err(full_err) if domains.has_aliases() => {
                let reduced = domains.primary_only();
                tracing::warn!(domains = %domains, error = %full_err, "issuance for the full domain set failed; retrying with the primary domain only");
                warnings.push(format!(
                    "aliases dropped ({}): {}",
                    domains.aliases().join(", "),
                    full_err
                ));

                self.acme
                    .issue(capability, &reduced, email)
                    .map_err(|e| DeployError::CertificateAcquisitionFailed {
                        domains: domains.to_string(),
                        reason: format!("{} (full set: {})", e, full_err),
                    })?;
                (reduced, true)
            }
            Err(e) => {
                return Err(DeployError::CertificateAcquisitionFailed {
                    domains: domains.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        if !self.is_present(capability, domains.primary())? {
            return Err(DeployError::CertificateAcquisitionFailed {
                domains: covered.to_string(),
                reason: format!(
                    "ACME client reported success but {} does not exist",
                    self.settings.artifact_path(domains.primary()).display()
                ),
            });
        }

        tracing::info!(covered = %covered, fallback, "certificate issued");
        Ok(CertificateOutcome {
            action: CertificateAction::Issued { fallback },
            covered,
            present: true,
            warnings,
        })
    }
}
