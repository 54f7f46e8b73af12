//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Keeps the non-blocking file appender alive for the process lifetime.
pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "weightd", version, about = "Load-cell weight gateway")]
pub struct Cli {
    /// Path to config TOML; also where calibration is persisted
    #[arg(long, value_name = "FILE", default_value = "etc/weightd.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Force demo mode (synthetic ADC), overriding the config
    #[arg(long, action = ArgAction::SetTrue)]
    pub demo: bool,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream readings to stdout as JSON lines until interrupted
    Run,
    /// Print a fixed number of readings as JSON lines, then exit
    Read {
        /// Number of readings to print
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Capture the current filtered raw value as the new zero reference
    Tare,
    /// Same computation as tare; named for the "should read zero" intent
    Zero,
    /// Derive the scale from a known reference mass sitting on the scale
    Calibrate {
        /// Reference mass in grams (must be > 0)
        #[arg(long)]
        grams: f64,
    },
}
