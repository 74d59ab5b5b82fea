//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod acme_client;
pub mod app_stack;
pub mod command_runner;
pub mod deploy_events;
pub mod file_system;
pub mod proxy_controller;

pub use acme_client::{AcmeClient, AcmeError, RenewalStatus};
pub use app_stack::{AppStack, StackError, TeardownOutcome};
pub use command_runner::{
    shell_quote, CommandOutput, CommandRunner, CommandSpec, OutputMode, ProcessError,
};
pub use deploy_events::{DeployEvent, DeployEventSink};
pub use file_system::{FileSystem, FsError, FsResult};
pub use proxy_controller::{PauseOutcome, ProxyController, ProxyError, ReloadOutcome};
