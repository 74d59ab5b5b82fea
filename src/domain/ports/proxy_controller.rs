//! Proxy Controller port
//!
//! Drives the external reverse proxy: syntax checks, reload signalling, and
//! releasing the HTTP validation port while certificates are issued.

use thiserror::Error;

use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::ProcessError;

/// Outcome of a reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The running proxy re-read its configuration
    Reloaded,
    /// No proxy process is running; it reads the new file when started
    NotRunning,
}

/// Outcome of asking the proxy to release the validation port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The proxy was stopped and must be resumed afterwards
    Paused,
    /// The proxy does not hold the port (e.g. it is part of the stopped stack)
    NotHeld,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Syntax check rejected the configuration
    #[error("{0}")]
    Invalid(String),

    /// A control command failed
    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

pub trait ProxyController {
    /// Ask the proxy to syntax-check the installed configuration
    fn validate(&self, capability: &RuntimeCapability) -> Result<(), ProxyError>;

    /// Signal a graceful reload (never a restart)
    fn reload(&self, capability: &RuntimeCapability) -> Result<ReloadOutcome, ProxyError>;

    /// Release the HTTP validation port before an ACME client binds it
    fn pause(&self, capability: &RuntimeCapability) -> Result<PauseOutcome, ProxyError>;

    /// Undo a successful `pause`
    fn resume(&self, capability: &RuntimeCapability) -> Result<(), ProxyError>;
}
