//! Codeweave CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use codeweave_cli::{Args, error_adapter::ErrorAdapter};

#[tokio::main]
async fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Codeweave");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = codeweave_cli::run(&args).await {
        if err.is_cancellation() {
            warn!("Cancelled");
            process::exit(err.exit_code());
        }

        let reporter = miette::GraphicalReportHandler::new();
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &ErrorAdapter(&err))
            .expect("Writing to String buffer is infallible");
        error!("{writer}");

        process::exit(err.exit_code());
    }

    info!("Completed successfully");
}
