//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::Started { domain, email } => {
                serde_json::json!({
                    "event": "start",
                    "command": "deploy",
                    "domain": domain,
                    "email": email,
                })
            }

            DeployEvent::StepStarted { step } => {
                serde_json::json!({
                    "event": "step",
                    "phase": "start",
                    "step": step,
                })
            }

            DeployEvent::StepFinished {
                step,
                status,
                detail,
            } => {
                serde_json::json!({
                    "event": "step",
                    "phase": "finish",
                    "step": step,
                    "status": status,
                    "detail": detail,
                })
            }

            DeployEvent::Warning { step, message } => {
                serde_json::json!({
                    "event": "warning",
                    "step": step,
                    "message": message,
                })
            }

            DeployEvent::StepFailed { step, code, error } => {
                serde_json::json!({
                    "event": "error",
                    "step": step,
                    "code": code,
                    "error": error,
                })
            }

            DeployEvent::Completed { url } => {
                serde_json::json!({
                    "event": "complete",
                    "command": "deploy",
                    "status": "success",
                    "url": url,
                })
            }
        };

        self.write_event(json);
    }
}
