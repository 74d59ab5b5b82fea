//! Reverse-proxy configuration
//!
//! Variant selection, template rendering, drift detection by byte comparison,
//! and the write → validate → reload sequence.

mod selector;
mod templates;


pub use selector::{ProxyApplyOutcome, ProxyConfigSelector};
pub use templates::{is_managed, Template, MANAGED_MARKER};
