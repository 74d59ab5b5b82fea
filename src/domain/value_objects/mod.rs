//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod access_strategy;
mod deploy_step;
mod domain_set;
mod hash;
mod proxy_variant;

pub use access_strategy::{AccessStrategy, StrategySelection};
pub use deploy_step::{DeployStep, StepStatus};
pub use domain_set::{normalize_hostname, DomainError, DomainSet};
pub use hash::ContentHash;
pub use proxy_variant::ProxyVariant;
