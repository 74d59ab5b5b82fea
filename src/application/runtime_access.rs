//! Runtime Access Resolver
//!
//! Finds a working way to invoke the container runtime. Strategies are probed
//! in order and the first that answers wins; later strategies are never
//! attempted. The result is resolved once per run and passed explicitly to
//! every collaborator.

use std::sync::Arc;

use crate::config::RuntimeSettings;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::CommandRunner;
use crate::domain::value_objects::AccessStrategy;
use crate::error::{DeployError, RUNTIME_ACCESS_REMEDIATION};

/// Cheap command that needs a working runtime connection
const PROBE_ARGS: [&str; 3] = ["info", "--format", "{{.ServerVersion}}"];

/// Why a single probe failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub strategy: AccessStrategy,
    pub reason: String,
}

/// The winning capability, plus the failed probes that preceded it
#[derive(Debug, Clone)]
pub struct ResolvedAccess {
    pub capability: RuntimeCapability,
    pub server_version: String,
    pub failed_attempts: Vec<ProbeAttempt>,
}

pub struct RuntimeAccessResolver {
    runner: Arc<dyn CommandRunner>,
    settings: RuntimeSettings,
}

impl RuntimeAccessResolver {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: RuntimeSettings) -> Self {
        Self { runner, settings }
    }

    pub fn resolve(&self) -> Result<ResolvedAccess, DeployError> {
        let mut failed_attempts = Vec::new();

        for strategy in self.settings.selection.candidates() {
            let capability = RuntimeCapability::new(
                strategy,
                &self.settings.program,
                &self.settings.group,
                Arc::clone(&self.runner),
            );

            match self.probe(&capability) {
                Ok(server_version) => {
                    tracing::info!(%strategy, %server_version, "runtime reachable");
                    return Ok(ResolvedAccess {
                        capability,
                        server_version,
                        failed_attempts,
                    });
                }
                Err(reason) => {
                    tracing::debug!(%strategy, %reason, "runtime probe failed");
                    failed_attempts.push(ProbeAttempt { strategy, reason });
                }
            }
        }

        let attempts = failed_attempts
            .iter()
            .map(|a| format!("{}: {}", a.strategy, a.reason))
            .collect::<Vec<_>>()
            .join("; ");
        Err(DeployError::NoRuntimeAccess {
            attempts,
            remediation: RUNTIME_ACCESS_REMEDIATION,
        })
    }

    fn probe(&self, capability: &RuntimeCapability) -> Result<String, String> {
        let output = capability
            .run(PROBE_ARGS, self.settings.probe_timeout)
            .map_err(|e| e.to_string())?;
        if output.success() {
            Ok(output.stdout.trim().to_string())
        } else {
            Err(output.failure_reason())
        }
    }
}
