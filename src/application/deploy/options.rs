//! Deploy Options
//!
//! Inputs of one deployment run.

use crate::config::{CertificateSettings, DeploySettings, ProxyMode, ProxySettings, RuntimeSettings};
use crate::domain::value_objects::DomainSet;

/// Options for the deploy use case
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOptions {
    /// Requested domains, primary first
    pub domains: DomainSet,
    /// ACME account contact
    pub email: String,
    pub runtime: RuntimeSettings,
    pub certificates: CertificateSettings,
    pub proxy: ProxySettings,
}

impl DeployOptions {
    pub fn from_settings(settings: &DeploySettings) -> Self {
        Self {
            domains: settings.domains.clone(),
            email: settings.email.clone(),
            runtime: settings.runtime.clone(),
            certificates: settings.certificates.clone(),
            proxy: settings.proxy.clone(),
        }
    }

    /// A host-managed proxy may hold port 80 while certificates are issued
    pub fn proxy_on_host(&self) -> bool {
        self.proxy.mode == ProxyMode::Host
    }
}
