//! Containerised nginx proxy
//!
//! The proxy runs as a service of the application stack, so during a
//! deployment it is normally down: validation happens in a throwaway
//! container with the same mounts, and reload only signals a running one.

use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::ProxySettings;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{PauseOutcome, ProxyController, ProxyError, ReloadOutcome};

/// Where nginx reads site fragments inside the container
const CONTAINER_SITES_DIR: &str = "/etc/nginx/conf.d";

pub struct ContainerProxy {
    settings: ProxySettings,
    certificate_dir: PathBuf,
}

impl ContainerProxy {
    pub fn new(settings: ProxySettings, certificate_dir: PathBuf) -> Self {
        Self {
            settings,
            certificate_dir,
        }
    }

    fn validate_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];

        // The upstream service is not running in the throwaway container;
        // point its name at loopback so nginx can resolve it.
        let host = self.settings.upstream_host();
        if host.parse::<IpAddr>().is_err() {
            args.push("--add-host".to_string());
            args.push(format!("{}:127.0.0.1", host));
        }

        args.extend([
            "-v".to_string(),
            format!("{}:{}:ro", self.settings.sites_dir.display(), CONTAINER_SITES_DIR),
            "-v".to_string(),
            format!(
                "{}:{}:ro",
                self.certificate_dir.display(),
                self.settings.certificate_root
            ),
            self.settings.image.clone(),
        ]);
        args.extend(self.settings.validate_command.iter().cloned());
        args
    }

    fn is_running(&self, capability: &RuntimeCapability) -> Result<bool, ProxyError> {
        let output = capability.run(
            [
                "inspect",
                "-f",
                "{{.State.Running}}",
                self.settings.container.as_str(),
            ],
            self.settings.timeout,
        )?;
        // A missing container fails inspect; that is "not running" too
        Ok(output.success() && output.stdout.trim() == "true")
    }
}

impl ProxyController for ContainerProxy {
    fn validate(&self, capability: &RuntimeCapability) -> Result<(), ProxyError> {
        let output = capability.run(self.validate_args(), self.settings.timeout)?;
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

    fn reload(&self, capability: &RuntimeCapability) -> Result<ReloadOutcome, ProxyError> {
        if !self.is_running(capability)? {
            tracing::info!(container = %self.settings.container, "proxy container not running; it will read the new configuration on start");
            return Ok(ReloadOutcome::NotRunning);
        }

        let mut args = vec!["exec".to_string(), self.settings.container.clone()];
        args.extend(self.settings.reload_command.iter().cloned());
        let output = capability.run(args, self.settings.timeout)?;
        if output.success() {
            Ok(ReloadOutcome::Reloaded)
        } else {
            Err(ProxyError::Command(output.failure_reason()))
        }
    }

    fn pause(&self, _capability: &RuntimeCapability) -> Result<PauseOutcome, ProxyError> {
        // Stopped together with the stack during teardown
        Ok(PauseOutcome::NotHeld)
    }

    fn resume(&self, _capability: &RuntimeCapability) -> Result<(), ProxyError> {
        Ok(())
    }
}

/// Validation output to show the operator, most useful stream first
pub(crate) fn validation_report(stderr: &str, stdout: &str, fallback: &str) -> String {
    [stderr, stdout]
        .iter()
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
