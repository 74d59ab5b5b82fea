//! Domain Services
//!
//! Pure business logic services with no I/O dependencies.

mod differ;
pub mod template;

pub use differ::{ConfigDiff, Differ};
pub use template::{render, TemplateError, TemplateVars};
