//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//!
//! ## Structure
//!
//! - `cli` - Command line definition (`Cli`, `ColorWhen`)
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//!
//! ## Usage
//!
//! ```ignore
//! use berth::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case(&settings, true);
//! let report = use_case.execute(&DeployOptions::from_settings(&settings), &sink)?;
//! ```

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen};
pub use factory::{create_deploy_use_case, ConcreteDeployUseCase};
