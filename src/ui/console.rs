//! Console Event Sink
//!
//! Prints one line per finished step as the pipeline runs.

use std::io::{self, Write};
use std::sync::Mutex;

use berth::domain::ports::{DeployEvent, DeployEventSink};
use berth::domain::value_objects::{DeployStep, StepStatus};

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub struct ConsoleEventSink {
    color: bool,
    unicode: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout(ui: &UiContext) -> Self {
        Self::with_writer(ui, io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(ui: &UiContext, writer: W) -> Self {
        Self {
            color: ui.color,
            unicode: ui.unicode,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn format_event(&self, event: &DeployEvent) -> Option<String> {
        let (color, unicode) = (self.color, self.unicode);
        match event {
            DeployEvent::Started { domain, email } => Some(format!(
                "{} {} {}",
                Icon::Deploy.colored(color, unicode),
                ColoredText::info(format!("Deploying {domain}"))
                    .bold()
                    .render(color),
                ColoredText::dim(format!("({email})")).render(color)
            )),
            // Only the steps that can take minutes get a start line
            DeployEvent::StepStarted { step }
                if matches!(step, DeployStep::Certificate | DeployStep::Build) =>
            {
                Some(format!(
                    "{} {}...",
                    Icon::Progress.colored(color, unicode),
                    step.label()
                ))
            }
            DeployEvent::StepStarted { .. } => None,
            DeployEvent::StepFinished {
                step,
                status,
                detail,
            } => {
                let (icon, suffix) = match status {
                    StepStatus::Executed => (Icon::Success, String::new()),
                    StepStatus::NoOp => (
                        Icon::Skipped,
                        format!(" {}", ColoredText::dim("(no-op)").render(color)),
                    ),
                };
                Some(format!(
                    "{} {}: {}{}",
                    icon.colored(color, unicode),
                    step.label(),
                    detail,
                    suffix
                ))
            }
            DeployEvent::Warning { step, message } => Some(format!(
                "{} {}",
                Icon::Warning.colored(color, unicode),
                ColoredText::warning(format!("{step}: {message}")).render(color)
            )),
            // Failures and the final summary are rendered by the caller
            DeployEvent::StepFailed { .. } | DeployEvent::Completed { .. } => None,
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let Some(line) = self.format_event(&event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}
