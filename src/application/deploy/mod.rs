//! Deploy Module
//!
//! Orchestrates one deployment run.
//!
//! ## Structure
//!
//! - `options` - Run inputs (`DeployOptions`)
//! - `result` - Run summary (`DeployReport`, `StepRecord`)
//! - `use_case` - The sequencer (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use berth::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(fs, runner, acme, proxy, stack);
//! let report = use_case.execute(&DeployOptions::from_settings(&settings), &sink)?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployReport, StepRecord};
pub use use_case::DeployUseCase;
