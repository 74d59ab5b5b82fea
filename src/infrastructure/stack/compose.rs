//! Docker Compose application stack

use crate::config::AppSettings;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{AppStack, StackError, TeardownOutcome};

pub struct ComposeStack {
    settings: AppSettings,
    /// Pass build output through to the terminal
    stream: bool,
}

impl ComposeStack {
    pub fn new(settings: AppSettings, stream: bool) -> Self {
        Self { settings, stream }
    }

    /// `compose -f <file> [-p <project>] [--env-file <file>] <args...>`
    fn compose_args(&self, args: &[&str]) -> Vec<String> {
        let mut argv = vec![
            "compose".to_string(),
            "-f".to_string(),
            self.settings.compose_file.display().to_string(),
        ];
        if let Some(project) = &self.settings.project_name {
            argv.extend(["-p".to_string(), project.clone()]);
        }
        if let Some(env_file) = &self.settings.env_file {
            argv.extend(["--env-file".to_string(), env_file.display().to_string()]);
        }
        argv.extend(args.iter().map(|a| a.to_string()));
        argv
    }
}

impl AppStack for ComposeStack {
    fn teardown(&self, capability: &RuntimeCapability) -> Result<TeardownOutcome, StackError> {
        let ps = capability.run(self.compose_args(&["ps", "-q"]), self.settings.teardown_timeout)?;
        if !ps.success() {
            return Err(StackError::from_output(&ps));
        }
        if ps.stdout.trim().is_empty() {
            return Ok(TeardownOutcome::AlreadyStopped);
        }

        let down = capability.run(
            self.compose_args(&["down", "--remove-orphans"]),
            self.settings.teardown_timeout,
        )?;
        if down.success() {
            Ok(TeardownOutcome::Stopped)
        } else {
            Err(StackError::from_output(&down))
        }
    }

    fn build(&self, capability: &RuntimeCapability) -> Result<(), StackError> {
        let args: &[&str] = if self.settings.pull {
            &["build", "--pull"]
        } else {
            &["build"]
        };
        let output = capability.run_streamed(
            self.compose_args(args),
            self.settings.build_timeout,
            self.stream,
        )?;
        if output.success() {
            Ok(())
        } else {
            Err(StackError::from_output(&output))
        }
    }

    fn start(&self, capability: &RuntimeCapability) -> Result<(), StackError> {
        let output = capability.run(self.compose_args(&["up", "-d"]), self.settings.start_timeout)?;
        if output.success() {
            Ok(())
        } else {
            Err(StackError::from_output(&output))
        }
    }
}
