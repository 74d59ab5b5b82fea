//! Domain Entities
//!
//! Objects with identity that live for the duration of a deployment run.

mod runtime_capability;

pub use runtime_capability::{RuntimeCapability, ELEVATION_PROGRAM, GROUP_SWITCH_PROGRAM};
