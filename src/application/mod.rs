//! Application Layer
//!
//! Use cases that orchestrate the deployment flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT talk to processes or disks directly (ports do)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Components
//!
//! - `RuntimeAccessResolver` - Probes how to invoke the container runtime
//! - `CertificateManager` - Issues or renews the TLS certificate
//! - `ProxyConfigSelector` - Installs the matching proxy configuration
//! - `DeployUseCase` - Runs the whole pipeline in order

pub mod certificates;
pub mod deploy;
pub mod proxy_config;
pub mod runtime_access;

#[cfg(test)]
pub(crate) mod testing;

pub use certificates::{CertificateAction, CertificateManager, CertificateOutcome};
pub use deploy::{DeployOptions, DeployReport, DeployUseCase, StepRecord};
pub use proxy_config::{ProxyApplyOutcome, ProxyConfigSelector};
pub use runtime_access::{ProbeAttempt, ResolvedAccess, RuntimeAccessResolver};
