//! Reverse proxy controllers
//!
//! - ContainerProxy: nginx as a service of the application stack
//! - HostProxy: nginx managed directly on the host

mod container;
mod host;

pub use container::ContainerProxy;
pub use host::HostProxy;
