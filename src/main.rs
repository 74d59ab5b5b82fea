//! Berth CLI - idempotent single-host deployment orchestrator
//!
//! Usage: berth [--config <PATH>] [--json] [--color <WHEN>] [-v...]
//!
//! One invocation runs the whole pipeline: resolve runtime access, stop the
//! running stack, ensure the certificate, install the proxy configuration,
//! build, start.

mod ui;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use berth::application::DeployOptions;
use berth::config::{self, ConfigError, DeploySettings};
use berth::domain::ports::{DeployEvent, DeployEventSink};
use berth::domain::value_objects::DeployStep;
use berth::error::{DeployError, StepFailure};
use berth::infrastructure::JsonEventSink;
use berth::presentation::{create_deploy_use_case, Cli};

use crate::ui::console::ConsoleEventSink;
use crate::ui::context::UiContext;
use crate::ui::views::deploy::{render_config_warning, render_deploy_summary, render_failure};

/// Overrides the verbosity-derived log filter (e.g. `debug`, `berth=trace`)
const LOG_ENV: &str = "BERTH_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("berth: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<u8> {
    let ui = UiContext::new(cli.json, cli.verbose, cli.color);
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;

    let sink: Box<dyn DeployEventSink> = if cli.json {
        Box::new(JsonEventSink::stdout())
    } else {
        Box::new(ConsoleEventSink::stdout(&ui))
    };

    let settings = match load_settings(cli.config.as_deref(), &cwd, &ui) {
        Ok(settings) => settings,
        Err(err) => {
            let failure = StepFailure::new(DeployStep::Config, DeployError::from(err));
            if cli.json {
                sink.on_event(DeployEvent::StepFailed {
                    step: failure.step,
                    code: failure.error.code(),
                    error: failure.error.to_string(),
                });
            }
            report_failure(&failure, &ui);
            return Ok(exit_code(&failure));
        }
    };

    let options = DeployOptions::from_settings(&settings);
    let use_case = create_deploy_use_case(&settings, !cli.json);

    match use_case.execute(&options, sink.as_ref()) {
        Ok(report) => {
            if !cli.json {
                print!("{}", render_deploy_summary(&report, ui.color, ui.unicode));
            }
            Ok(0)
        }
        Err(failure) => {
            report_failure(&failure, &ui);
            Ok(exit_code(&failure))
        }
    }
}

fn load_settings(
    explicit: Option<&Path>,
    cwd: &Path,
    ui: &UiContext,
) -> Result<DeploySettings, ConfigError> {
    let loaded = config::load(explicit, cwd)?;
    for warning in &loaded.warnings {
        eprint!("{}", render_config_warning(warning, ui.color, ui.unicode));
    }
    DeploySettings::resolve(&loaded.config, &loaded.base_dir)
}

/// The failing step always reaches stderr; with `--json` stdout stays NDJSON-only
fn report_failure(failure: &StepFailure, ui: &UiContext) {
    let color = ui.color && !ui.json;
    eprint!("{}", render_failure(failure, color, ui.unicode));
}

fn exit_code(failure: &StepFailure) -> u8 {
    u8::try_from(failure.error.exit_code()).unwrap_or(1)
}
