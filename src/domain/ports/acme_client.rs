//! ACME Client port
//!
//! The orchestrator never does certificate cryptography itself; it drives an
//! external ACME client through this interface.

use thiserror::Error;

use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::ProcessError;
use crate::domain::value_objects::DomainSet;

/// Result of a renew-if-due request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalStatus {
    /// The certificate was due and has been renewed
    Renewed,
    /// The certificate is not yet due; nothing changed
    NotDue,
}

/// ACME client errors
#[derive(Debug, Error)]
pub enum AcmeError {
    /// The client ran but reported failure (e.g. a challenge failed)
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

pub trait AcmeClient {
    /// Request a new certificate covering every domain in `domains`.
    ///
    /// Binds the standard HTTP validation port for the duration of the call.
    fn issue(
        &self,
        capability: &RuntimeCapability,
        domains: &DomainSet,
        email: &str,
    ) -> Result<(), AcmeError>;

    /// Renew the certificate lineage named after `primary` if it is due
    fn renew(&self, capability: &RuntimeCapability, primary: &str)
        -> Result<RenewalStatus, AcmeError>;

    /// Domains listed for the lineage named after `primary`, if known
    fn covered_domains(
        &self,
        capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<Option<Vec<String>>, AcmeError>;

    /// Check for the certificate artifact from inside the runtime.
    ///
    /// Used when the certificate directory cannot be read by the current user.
    fn certificate_present(
        &self,
        capability: &RuntimeCapability,
        primary: &str,
    ) -> Result<bool, AcmeError>;
}
