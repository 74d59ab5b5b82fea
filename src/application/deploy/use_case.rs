//! Deploy Use Case
//!
//! The deployment sequencer. Runs the pipeline in a fixed order, stops at the
//! first fatal error, and names the failing step:
//!
//! 1. runtime-access - resolve how to invoke the container runtime
//! 2. teardown - stop the previously running stack
//! 3. certificate - issue or renew the TLS certificate
//! 4. proxy-config - install the matching proxy configuration
//! 5. build - rebuild images
//! 6. start - start the stack
//!
//! No step is retried here and nothing is rolled back across steps; every
//! decision is re-derived from disk and runtime facts on the next run.

use std::sync::Arc;

use crate::application::certificates::{CertificateAction, CertificateManager, CertificateOutcome};
use crate::application::proxy_config::{ProxyApplyOutcome, ProxyConfigSelector};
use crate::application::runtime_access::RuntimeAccessResolver;
use crate::domain::entities::RuntimeCapability;
use crate::domain::ports::{
    AcmeClient, AppStack, CommandRunner, DeployEvent, DeployEventSink, FileSystem, PauseOutcome,
    ProxyController, ReloadOutcome, TeardownOutcome,
};
use crate::domain::value_objects::{DeployStep, StepStatus};
use crate::error::{DeployError, StepFailure};

use super::options::DeployOptions;
use super::result::{DeployReport, StepRecord};

/// Deploy use case - orchestrates the deployment pipeline
///
/// Parameterized by its collaborators (ports), so the whole pipeline can run
/// against in-memory doubles.
pub struct DeployUseCase<FS>
where
    FS: FileSystem,
{
    file_system: FS,
    runner: Arc<dyn CommandRunner>,
    acme: Box<dyn AcmeClient>,
    proxy: Box<dyn ProxyController>,
    stack: Box<dyn AppStack>,
}

impl<FS> DeployUseCase<FS>
where
    FS: FileSystem,
{
    pub fn new(
        file_system: FS,
        runner: Arc<dyn CommandRunner>,
        acme: Box<dyn AcmeClient>,
        proxy: Box<dyn ProxyController>,
        stack: Box<dyn AppStack>,
    ) -> Self {
        Self {
            file_system,
            runner,
            acme,
            proxy,
            stack,
        }
    }

    /// Execute the pipeline, reporting progress to `events`
    pub fn execute(
        &self,
        options: &DeployOptions,
        events: &dyn DeployEventSink,
    ) -> Result<DeployReport, StepFailure> {
        let mut progress = Progress::new(events);

        events.on_event(DeployEvent::Started {
            domain: options.domains.primary().to_string(),
            email: options.email.clone(),
        });

        // Step 1: resolve runtime access, once for the whole run
        progress.start(DeployStep::RuntimeAccess);
        let resolved = RuntimeAccessResolver::new(Arc::clone(&self.runner), options.runtime.clone())
            .resolve()
            .map_err(|e| progress.fail(DeployStep::RuntimeAccess, e))?;
        let capability = resolved.capability;
        progress.finish(
            DeployStep::RuntimeAccess,
            StepStatus::Executed,
            format!(
                "{} (server {})",
                capability.strategy(),
                resolved.server_version
            ),
        );

        // Step 2: stop the running stack, which also frees port 80
        progress.start(DeployStep::Teardown);
        match self.stack.teardown(&capability) {
            Ok(TeardownOutcome::Stopped) => progress.finish(
                DeployStep::Teardown,
                StepStatus::Executed,
                "stopped running containers",
            ),
            Ok(TeardownOutcome::AlreadyStopped) => {
                progress.finish(DeployStep::Teardown, StepStatus::NoOp, "nothing running")
            }
            Err(e) => {
                return Err(progress.fail(
                    DeployStep::Teardown,
                    DeployError::TeardownFailed {
                        reason: e.to_string(),
                    },
                ))
            }
        }

        // Step 3: certificate
        progress.start(DeployStep::Certificate);
        let certificate = self
            .ensure_certificate(options, &capability)
            .map_err(|e| progress.fail(DeployStep::Certificate, e))?;
        for warning in &certificate.warnings {
            progress.warn(DeployStep::Certificate, warning);
        }
        progress.finish(
            DeployStep::Certificate,
            if certificate.action.changed() {
                StepStatus::Executed
            } else {
                StepStatus::NoOp
            },
            describe_certificate(&certificate),
        );

        // Step 4: proxy configuration
        progress.start(DeployStep::ProxyConfig);
        let selector =
            ProxyConfigSelector::new(&self.file_system, &*self.proxy, &options.proxy);
        let applied = selector
            .apply(&certificate.covered, certificate.present, &capability)
            .map_err(|e| progress.fail(DeployStep::ProxyConfig, e))?;
        progress.finish(
            DeployStep::ProxyConfig,
            if applied.changed {
                StepStatus::Executed
            } else {
                StepStatus::NoOp
            },
            describe_proxy(&applied),
        );

        // Step 5: build
        progress.start(DeployStep::Build);
        self.stack.build(&capability).map_err(|e| {
            progress.fail(
                DeployStep::Build,
                DeployError::BuildFailed {
                    reason: e.to_string(),
                },
            )
        })?;
        progress.finish(DeployStep::Build, StepStatus::Executed, "images built");

        // Step 6: start
        progress.start(DeployStep::Start);
        self.stack.start(&capability).map_err(|e| {
            progress.fail(
                DeployStep::Start,
                DeployError::StartFailed {
                    reason: e.to_string(),
                },
            )
        })?;
        progress.finish(DeployStep::Start, StepStatus::Executed, "stack started");

        let url = format!(
            "{}://{}",
            applied.variant.scheme(),
            certificate.covered.primary()
        );
        events.on_event(DeployEvent::Completed { url: url.clone() });

        Ok(DeployReport {
            url,
            strategy: capability.strategy(),
            covered: certificate.covered.to_vec(),
            uncovered: options
                .domains
                .aliases()
                .iter()
                .filter(|alias| !certificate.covered.contains(alias))
                .cloned()
                .collect(),
            variant: applied.variant,
            steps: progress.steps,
            warnings: progress.warnings,
        })
    }

    /// Ensure the certificate, releasing port 80 from a host proxy meanwhile
    fn ensure_certificate(
        &self,
        options: &DeployOptions,
        capability: &RuntimeCapability,
    ) -> Result<CertificateOutcome, DeployError> {
        let manager =
            CertificateManager::new(&*self.acme, &self.file_system, &options.certificates);

        let paused = if options.proxy_on_host() {
            self.proxy
                .pause(capability)
                .map_err(|e| DeployError::ProxyControlFailed {
                    action: "pause",
                    reason: e.to_string(),
                })?
        } else {
            PauseOutcome::NotHeld
        };

        let outcome = manager.ensure(&options.domains, &options.email, capability);

        if paused == PauseOutcome::Paused {
            if let Err(e) = self.proxy.resume(capability) {
                let resume_error = DeployError::ProxyControlFailed {
                    action: "resume",
                    reason: e.to_string(),
                };
                return match outcome {
                    Ok(_) => Err(resume_error),
                    Err(cert_error) => {
                        tracing::error!(error = %resume_error, "proxy could not be resumed after certificate failure");
                        Err(cert_error)
                    }
                };
            }
        }

        outcome
    }
}

/// Step bookkeeping and event emission
struct Progress<'e> {
    events: &'e dyn DeployEventSink,
    steps: Vec<StepRecord>,
    warnings: Vec<String>,
}

impl<'e> Progress<'e> {
    fn new(events: &'e dyn DeployEventSink) -> Self {
        Self {
            events,
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn start(&self, step: DeployStep) {
        tracing::debug!(%step, "step started");
        self.events.on_event(DeployEvent::StepStarted { step });
    }

    fn finish(&mut self, step: DeployStep, status: StepStatus, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::info!(%step, status = status.as_str(), %detail, "step finished");
        self.events.on_event(DeployEvent::StepFinished {
            step,
            status,
            detail: detail.clone(),
        });
        self.steps.push(StepRecord {
            step,
            status,
            detail,
        });
    }

    fn warn(&mut self, step: DeployStep, message: &str) {
        self.events.on_event(DeployEvent::Warning {
            step,
            message: message.to_string(),
        });
        self.warnings.push(message.to_string());
    }

    fn fail(&self, step: DeployStep, error: DeployError) -> StepFailure {
        tracing::debug!(%step, %error, "step failed");
        self.events.on_event(DeployEvent::StepFailed {
            step,
            code: error.code(),
            error: error.to_string(),
        });
        StepFailure::new(step, error)
    }
}

fn describe_certificate(outcome: &CertificateOutcome) -> String {
    match &outcome.action {
        CertificateAction::Issued { fallback: false } => {
            format!("issued for {}", outcome.covered)
        }
        CertificateAction::Issued { fallback: true } => {
            format!("issued for {} only (aliases dropped)", outcome.covered)
        }
        CertificateAction::Renewed => format!("renewed ({})", outcome.covered),
        CertificateAction::RenewalNotDue => {
            format!("valid, not yet due for renewal ({})", outcome.covered)
        }
        CertificateAction::RenewalFailed { .. } => {
            format!("renewal failed, existing certificate kept ({})", outcome.covered)
        }
    }
}

fn describe_proxy(outcome: &ProxyApplyOutcome) -> String {
    if !outcome.changed {
        return format!("{} configuration unchanged", outcome.variant);
    }
    let reload = match outcome.reload {
        Some(ReloadOutcome::Reloaded) => "reloaded",
        Some(ReloadOutcome::NotRunning) | None => "proxy not running",
    };
    let mut detail = format!(
        "{} configuration installed ({}), {}",
        outcome.variant, outcome.diff_summary, reload
    );
    if !outcome.retired.is_empty() {
        detail.push_str(&format!(", {} retired", outcome.retired.len()));
    }
    detail
}
