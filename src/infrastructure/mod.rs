//! Infrastructure Layer
//!
//! Concrete implementations of domain ports:
//! - Process execution (`SystemRunner`)
//! - File system (`LocalFs`)
//! - ACME client (`CertbotClient`)
//! - Reverse proxy control (`ContainerProxy`, `HostProxy`)
//! - Application stack (`ComposeStack`)
//! - Event sinks (`JsonEventSink`)

pub mod acme;
pub mod events;
pub mod fs;
pub mod process;
pub mod proxy;
pub mod stack;

pub use acme::CertbotClient;
pub use events::JsonEventSink;
pub use fs::LocalFs;
pub use process::SystemRunner;
pub use proxy::{ContainerProxy, HostProxy};
pub use stack::ComposeStack;
