//! Deployment pipeline steps, in execution order

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployStep {
    /// Settings could not be turned into a deployment run
    Config,
    RuntimeAccess,
    Teardown,
    Certificate,
    ProxyConfig,
    Build,
    Start,
}

impl DeployStep {
    /// Steps the sequencer executes, in order
    pub const PIPELINE: [DeployStep; 6] = [
        DeployStep::RuntimeAccess,
        DeployStep::Teardown,
        DeployStep::Certificate,
        DeployStep::ProxyConfig,
        DeployStep::Build,
        DeployStep::Start,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStep::Config => "config",
            DeployStep::RuntimeAccess => "runtime-access",
            DeployStep::Teardown => "teardown",
            DeployStep::Certificate => "certificate",
            DeployStep::ProxyConfig => "proxy-config",
            DeployStep::Build => "build",
            DeployStep::Start => "start",
        }
    }

    /// Short human label for progress output
    pub fn label(&self) -> &'static str {
        match self {
            DeployStep::Config => "Load configuration",
            DeployStep::RuntimeAccess => "Resolve runtime access",
            DeployStep::Teardown => "Stop running stack",
            DeployStep::Certificate => "Ensure TLS certificate",
            DeployStep::ProxyConfig => "Apply proxy configuration",
            DeployStep::Build => "Build images",
            DeployStep::Start => "Start stack",
        }
    }
}

impl std::fmt::Display for DeployStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a finished step changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Executed,
    /// Already in the desired state; nothing was changed
    NoOp,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Executed => "executed",
            StepStatus::NoOp => "no-op",
        }
    }
}
