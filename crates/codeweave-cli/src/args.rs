//! Command-line argument definitions for the Codeweave CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the scenario and report paths,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Codeweave driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the scenario file (TOML)
    #[arg(help = "Path to the scenario file")]
    pub input: String,

    /// Path to the text report
    #[arg(short, long, default_value = "report.txt")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
