//! Host-managed proxy
//!
//! nginx installed on the host and controlled with plain commands (for
//! example `nginx -t`, `nginx -s reload`, `systemctl stop nginx`). These run
//! outside the container runtime, so the capability is not used.

use std::sync::Arc;

use super::container::validation_report;
use crate::config::ProxySettings;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{
    CommandOutput, CommandRunner, CommandSpec, PauseOutcome, ProxyController, ProxyError,
    ReloadOutcome,
};

/// nginx mentions its pid file when no master process is running
const NOT_RUNNING_MARKER: &str = "nginx.pid";

pub struct HostProxy {
    settings: ProxySettings,
    runner: Arc<dyn CommandRunner>,
}

impl HostProxy {
    pub fn new(settings: ProxySettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self { settings, runner }
    }

    fn run(&self, argv: &[String]) -> Result<CommandOutput, ProxyError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ProxyError::Command("empty proxy command".to_string()))?;
        let spec = CommandSpec::new(program, self.settings.timeout).args(args.iter().cloned());
        tracing::debug!(command = %spec.display(), "proxy command");
        Ok(self.runner.run(&spec)?)
    }
}

impl ProxyController for HostProxy {
    fn validate(&self, _capability: &RuntimeCapability) -> Result<(), ProxyError> {
        let output = self.run(&self.settings.validate_command)?;
        if output.success() {
            Ok(())
        } else {
            Err(ProxyError::Invalid(validation_report(
                &output.stderr,
                &output.stdout,
                &output.failure_reason(),
            )))
        }
    }

    fn reload(&self, _capability: &RuntimeCapability) -> Result<ReloadOutcome, ProxyError> {
        let output = self.run(&self.settings.reload_command)?;
        if output.success() {
            return Ok(ReloadOutcome::Reloaded);
        }
        if output.stderr.contains(NOT_RUNNING_MARKER) {
            tracing::info!("host proxy not running; it will read the new configuration on start");
            return Ok(ReloadOutcome::NotRunning);
        }
        Err(ProxyError::Command(output.failure_reason()))
    }

    fn pause(&self, _capability: &RuntimeCapability) -> Result<PauseOutcome, ProxyError> {
        let Some(stop) = &self.settings.stop_command else {
            return Ok(PauseOutcome::NotHeld);
        };
        if !self.settings.status_command.is_empty()
            && !self.run(&self.settings.status_command)?.success()
        {
            tracing::info!("host proxy already stopped; leaving it stopped");
            return Ok(PauseOutcome::NotHeld);
        }
        let output = self.run(stop)?;
        if output.success() {
            Ok(PauseOutcome::Paused)
        } else {
            Err(ProxyError::Command(output.failure_reason()))
        }
    }

    fn resume(&self, _capability: &RuntimeCapability) -> Result<(), ProxyError> {
        let Some(start) = &self.settings.start_command else {
            return Ok(());
        };
        let output = self.run(start)?;
        if output.success() {
            Ok(())
        } else {
            Err(ProxyError::Command(output.failure_reason()))
        }
    }
}
