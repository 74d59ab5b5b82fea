//! Berth - idempotent single-host deployment orchestrator
//!
//! Berth brings one host to a known state on every run: the application
//! stack is rebuilt and restarted behind an nginx reverse proxy, with a TLS
//! certificate issued or renewed along the way. Running it twice in a row is
//! safe; steps that are already satisfied report themselves as no-ops.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeployUseCase};
pub use config::{Config, DeploySettings};
pub use domain::value_objects::{AccessStrategy, DeployStep, DomainSet, ProxyVariant, StepStatus};
pub use error::{DeployError, StepFailure};
