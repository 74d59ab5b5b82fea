//! Runtime capability - the resolved way to run container runtime commands
//!
//! Created once by the runtime access resolver and passed explicitly to every
//! collaborator that needs the runtime, so the whole run uses one strategy.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    shell_quote, CommandOutput, CommandRunner, CommandSpec, ProcessError,
};
use crate::domain::value_objects::AccessStrategy;

/// Program used for group switching without a new login session
pub const GROUP_SWITCH_PROGRAM: &str = "sg";
/// Program used for explicit privilege elevation
pub const ELEVATION_PROGRAM: &str = "sudo";

#[derive(Clone)]
pub struct RuntimeCapability {
    strategy: AccessStrategy,
    program: String,
    group: String,
    runner: Arc<dyn CommandRunner>,
}

impl RuntimeCapability {
    pub fn new(
        strategy: AccessStrategy,
        program: impl Into<String>,
        group: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            strategy,
            program: program.into(),
            group: group.into(),
            runner,
        }
    }

    pub fn strategy(&self) -> AccessStrategy {
        self.strategy
    }

    /// Runtime program name (e.g. `docker`)
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the wrapped command for `program args...` under this strategy
    pub fn command<I, S>(&self, args: I, timeout: Duration) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match self.strategy {
            AccessStrategy::Direct => CommandSpec::new(&self.program, timeout).args(args),
            AccessStrategy::GroupSwitch => {
                let line = std::iter::once(self.program.as_str())
                    .chain(args.iter().map(String::as_str))
                    .map(shell_quote)
                    .collect::<Vec<_>>()
                    .join(" ");
                CommandSpec::new(GROUP_SWITCH_PROGRAM, timeout)
                    .arg(&self.group)
                    .arg("-c")
                    .arg(line)
            }
            AccessStrategy::Elevated => CommandSpec::new(ELEVATION_PROGRAM, timeout)
                .arg(&self.program)
                .args(args),
        }
    }

    /// Run a runtime command, capturing its output
    pub fn run<I, S>(&self, args: I, timeout: Duration) -> Result<CommandOutput, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self.command(args, timeout);
        tracing::debug!(strategy = %self.strategy, command = %spec.display(), "runtime command");
        self.runner.run(&spec)
    }

    /// Run a runtime command, optionally streaming its output to the terminal
    pub fn run_streamed<I, S>(
        &self,
        args: I,
        timeout: Duration,
        stream: bool,
    ) -> Result<CommandOutput, ProcessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = self.command(args, timeout).streamed(stream);
        tracing::debug!(strategy = %self.strategy, command = %spec.display(), "runtime command");
        self.runner.run(&spec)
    }
}

impl fmt::Debug for RuntimeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeCapability")
            .field("strategy", &self.strategy)
            .field("program", &self.program)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}
