//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::DeployUseCase;
use crate::config::{DeploySettings, ProxyMode};
use crate::domain::ports::{CommandRunner, ProxyController};
use crate::infrastructure::{
    CertbotClient, ComposeStack, ContainerProxy, HostProxy, LocalFs, SystemRunner,
};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<LocalFs>;

/// Create a deploy use case with all dependencies wired up
///
/// `stream_output` passes long-running build output through to the terminal;
/// it must be off when stdout carries NDJSON.
pub fn create_deploy_use_case(
    settings: &DeploySettings,
    stream_output: bool,
) -> ConcreteDeployUseCase {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());

    let proxy: Box<dyn ProxyController> = match settings.proxy.mode {
        ProxyMode::Container => Box::new(ContainerProxy::new(
            settings.proxy.clone(),
            settings.certificates.dir.clone(),
        )),
        ProxyMode::Host => Box::new(HostProxy::new(settings.proxy.clone(), Arc::clone(&runner))),
    };

    DeployUseCase::new(
        LocalFs::new(),
        runner,
        Box::new(CertbotClient::new(settings.certificates.clone())),
        proxy,
        Box::new(ComposeStack::new(settings.app.clone(), stream_output)),
    )
}
