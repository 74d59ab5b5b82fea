//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables progress reporting, JSON event streams, and debugging.

use crate::domain::value_objects::{DeployStep, StepStatus};

/// Event emitted during a deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// Run started
    Started { domain: String, email: String },

    /// A pipeline step started
    StepStarted { step: DeployStep },

    /// A pipeline step finished successfully
    StepFinished {
        step: DeployStep,
        status: StepStatus,
        detail: String,
    },

    /// A degraded but acceptable condition (e.g. renewal failed)
    Warning { step: DeployStep, message: String },

    /// A pipeline step failed; the run stops here
    StepFailed {
        step: DeployStep,
        /// Stable error class, see `DeployError::code`
        code: &'static str,
        error: String,
    },

    /// Every step succeeded
    Completed { url: String },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: step lines in the terminal
/// - JsonEventSink: NDJSON event stream for CI
pub trait DeployEventSink {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}
