//! Process execution
//!
//! Concrete implementation of the CommandRunner port.

mod system;

pub use system::SystemRunner;
