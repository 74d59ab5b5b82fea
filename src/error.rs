//! Error types for Berth
//!
//! Uses `thiserror` for library errors. Only conditions that stop the
//! pipeline live here; recognised no-ops ("already stopped", "config
//! unchanged", "renewal not due") are result variants, never errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::value_objects::{DeployStep, ProxyVariant};

/// Remediation shown when no runtime access strategy works
pub const RUNTIME_ACCESS_REMEDIATION: &str = "add your user to the runtime's group and re-authenticate the group membership \
(log out and back in, or run `newgrp docker`), or allow `sudo` for the runtime, then re-run";

/// Main error type for a deployment run
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration or domain input is unusable
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No probe strategy could reach the container runtime
    #[error("no container runtime access ({attempts}); {remediation}")]
    NoRuntimeAccess {
        attempts: String,
        remediation: &'static str,
    },

    /// The previous stack instance could not be stopped
    #[error("failed to stop running stack: {reason}")]
    TeardownFailed { reason: String },

    /// Both the full-set and the primary-only issuance failed
    #[error("certificate acquisition failed for {domains}: {reason}")]
    CertificateAcquisitionFailed { domains: String, reason: String },

    /// A proxy template could not be rendered
    #[error("{variant} proxy template {}: {message}", path.display())]
    TemplateInvalid {
        variant: ProxyVariant,
        path: PathBuf,
        message: String,
    },

    /// The proxy rejected the new configuration; the previous one stays live
    #[error("proxy rejected the new configuration (previous configuration kept): {output}")]
    ConfigValidationFailed { output: String },

    /// Reload, pause, or resume could not be signalled
    #[error("proxy {action} failed: {reason}")]
    ProxyControlFailed { action: &'static str, reason: String },

    /// The build collaborator failed
    #[error("build failed: {reason}")]
    BuildFailed { reason: String },

    /// The stack could not be started
    #[error("start failed: {reason}")]
    StartFailed { reason: String },

    /// Reading or writing a managed file failed
    #[error(transparent)]
    Io(#[from] crate::domain::ports::FsError),
}

impl DeployError {
    /// Process exit code for this error class
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::InvalidConfig { .. } => 2,
            DeployError::NoRuntimeAccess { .. } => 3,
            DeployError::TeardownFailed { .. } => 4,
            DeployError::CertificateAcquisitionFailed { .. } => 5,
            DeployError::TemplateInvalid { .. }
            | DeployError::ConfigValidationFailed { .. }
            | DeployError::ProxyControlFailed { .. } => 6,
            DeployError::BuildFailed { .. } => 7,
            DeployError::StartFailed { .. } => 8,
            DeployError::Io(_) => 1,
        }
    }

    /// Stable machine-readable code carried by the NDJSON `error` event
    pub fn code(&self) -> &'static str {
        match self {
            DeployError::InvalidConfig { .. } => "invalid_config",
            DeployError::NoRuntimeAccess { .. } => "no_runtime_access",
            DeployError::TeardownFailed { .. } => "teardown_failed",
            DeployError::CertificateAcquisitionFailed { .. } => "certificate_acquisition_failed",
            DeployError::TemplateInvalid { .. } => "template_invalid",
            DeployError::ConfigValidationFailed { .. } => "config_validation_failed",
            DeployError::ProxyControlFailed { .. } => "proxy_control_failed",
            DeployError::BuildFailed { .. } => "build_failed",
            DeployError::StartFailed { .. } => "start_failed",
            DeployError::Io(_) => "io",
        }
    }
}

/// A fatal error together with the step that raised it
#[derive(Error, Debug)]
#[error("{step}: {error}")]
pub struct StepFailure {
    pub step: DeployStep,
    #[source]
    pub error: DeployError,
}

impl StepFailure {
    pub fn new(step: DeployStep, error: DeployError) -> Self {
        Self { step, error }
    }
}
