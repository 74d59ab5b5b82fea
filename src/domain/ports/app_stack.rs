//! Application Stack port
//!
//! The build/start collaborator. Only exit codes and streamed output are
//! consumed; what the stack does is opaque to the orchestrator.

use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::CommandOutput;
use crate::domain::ports::ProcessError;

/// Outcome of tearing down the running stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Running containers were stopped and removed
    Stopped,
    /// Nothing was running
    AlreadyStopped,
}

pub trait AppStack {
    /// Stop any previously running instance
    fn teardown(&self, capability: &RuntimeCapability) -> Result<TeardownOutcome, StackError>;

    /// Rebuild images from current sources
    fn build(&self, capability: &RuntimeCapability) -> Result<(), StackError>;

    /// Start the stack in the background
    fn start(&self, capability: &RuntimeCapability) -> Result<(), StackError>;
}

/// Stack command errors
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// The collaborator ran and failed; its reason is passed through
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl StackError {
    /// Build a failure from a completed command's output
    pub fn from_output(output: &CommandOutput) -> Self {
        StackError::Failed(output.failure_reason())
    }
}
