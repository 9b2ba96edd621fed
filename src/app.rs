//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging
//! - runs the fetch/normalize/aggregate pipeline
//! - writes the polls and trends CSVs

use clap::Parser;
use tracing::info;

use crate::error::PollError;

pub mod pipeline;

/// Entry point for the `polls` binary.
pub fn run() -> Result<(), PollError> {
    let cli = crate::cli::Cli::parse();

    crate::logging::init(&cli.log_level, cli.log_file.as_deref(), cli.log_to_stdout)?;
    info!("poll downloader & aggregator starting");

    let config = cli.aggregation_config();
    config.validate()?;

    let output = pipeline::run(&config)?;

    crate::io::write_polls_csv(&cli.polls_out, &output.polls)?;
    crate::io::write_trends_csv(&cli.trends_out, &output.trends)?;

    info!(
        polls = %cli.polls_out.display(),
        trends = %cli.trends_out.display(),
        "done"
    );
    Ok(())
}
