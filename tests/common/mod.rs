//! Common test utilities for Berth CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated project and HOME with a generated `berth.toml`
//! - `RuntimeBehavior`: Knobs for the fake container runtime

#![allow(dead_code)]

pub mod env;
pub mod fake_runtime;

pub use env::*;
pub use fake_runtime::RuntimeBehavior;
