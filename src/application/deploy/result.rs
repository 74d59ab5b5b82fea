//! Deploy Result
//!
//! Summary of a successful deployment run.

use serde::Serialize;

use crate::domain::value_objects::{AccessStrategy, DeployStep, ProxyVariant, StepStatus};

/// How one pipeline step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: DeployStep,
    pub status: StepStatus,
    pub detail: String,
}

/// Result of a deployment run that reached the end of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    /// Effective URL, `https://` when the secured variant is installed
    pub url: String,
    pub strategy: AccessStrategy,
    /// Domains the certificate covers
    pub covered: Vec<String>,
    /// Requested aliases the certificate does not cover
    pub uncovered: Vec<String>,
    pub variant: ProxyVariant,
    pub steps: Vec<StepRecord>,
    pub warnings: Vec<String>,
}

impl DeployReport {
    pub fn status_of(&self, step: DeployStep) -> Option<StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| r.status)
    }

    pub fn executed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|r| r.status == StepStatus::Executed)
            .count()
    }
}
