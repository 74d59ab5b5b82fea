//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - There are no subcommands and no positional arguments: one invocation is
//!   one deployment run
//! - Everything about *what* to deploy comes from configuration

use std::path::PathBuf;

use clap::Parser;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Berth - idempotent single-host deployment orchestrator
#[derive(Parser, Debug)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Configuration is read from --config, ./berth.toml, or ~/.config/berth/config.toml.\nBERTH_DOMAIN, BERTH_EMAIL and BERTH_ALIASES override the file."
)]
pub struct Cli {
    /// Configuration file (defaults to ./berth.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events on stdout
    #[arg(long)]
    pub json: bool,

    /// Color output mode
    #[arg(long, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
