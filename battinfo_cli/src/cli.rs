//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file used when `--config` is not given. Missing is fine.
pub const DEFAULT_CONFIG: &str = "etc/battinfo.toml";

#[derive(Parser, Debug)]
#[command(name = "battinfo", version, about = "Battery telemetry CLI")]
pub struct Cli {
    /// Path to config TOML [default: etc/battinfo.toml, optional]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print readings and logs as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides the config
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll once and print every available reading
    Show {
        /// Also list omitted readings and why (on stderr)
        #[arg(long, action = ArgAction::SetTrue)]
        explain: bool,
    },
    /// Poll once and print clipboard-ready "label: value" lines
    Export {
        /// Write to this file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Fail (exit 4) when the registry snapshot cannot be taken
        #[arg(long, action = ArgAction::SetTrue)]
        strict: bool,
    },
    /// Poll repeatedly until interrupted
    Watch {
        /// Time between polls (overrides watch.interval_ms)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// Stop after this many polls; 0 = until Ctrl-C (overrides watch.count)
        #[arg(long, value_name = "N")]
        count: Option<u64>,
    },
    /// Verify the engine against the built-in simulated battery
    SelfCheck,
}
