//! Event Sink Implementations
//!
//! Provides concrete implementations of DeployEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - ConsoleEventSink (in `ui`): human-readable step lines

mod json;

pub use json::JsonEventSink;
