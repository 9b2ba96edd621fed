//! Command-line parsing for the poll downloader & aggregator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! retrieval/aggregation code: flags are translated into an
//! `AggregationConfig` plus output/logging options, and nothing here touches
//! the network or the data.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{
    AggregationConfig, AggType, CandidateSelector, DateBound, Interpolation,
};

/// Download poll results, aggregate them into daily trends, write both to CSV.
#[derive(Debug, Parser)]
#[command(name = "polls", version, about = "Poll downloader & trend aggregator")]
pub struct Cli {
    /// Date from which to collect polls (YYYY-MM-DD).
    #[arg(long = "from-date", value_name = "DATE")]
    pub from_date: Option<String>,

    /// Date up to which (inclusive) to collect polls (YYYY-MM-DD).
    #[arg(long = "to-date", value_name = "DATE")]
    pub to_date: Option<String>,

    /// Aggregation type.
    #[arg(long = "agg-type", value_enum, default_value_t = AggType::Mean)]
    pub agg_type: AggType,

    /// Candidates to aggregate polls for. Defaults to all candidates.
    #[arg(short = 'c', long, num_args = 0.., value_name = "NAME")]
    pub candidates: Vec<String>,

    /// Increment of days between aggregated output rows.
    #[arg(long = "increment-days", default_value_t = 1)]
    pub increment_days: u32,

    /// Lead time (days) to reach back for when a day has no polls.
    #[arg(long = "lead-time", default_value_t = 1)]
    pub lead_time: u32,

    /// Widen an empty lead-time window until it reaches data (enabled by default).
    #[arg(long = "lead-override", default_value_t = true)]
    pub lead_override: bool,

    /// Disable lead-time window widening.
    #[arg(long = "no-lead-override")]
    pub no_lead_override: bool,

    /// When to interpolate data from preceding days.
    #[arg(long, value_enum, default_value_t = Interpolation::IfMissing)]
    pub interpolation: Interpolation,

    /// Filepath for the raw polls CSV.
    #[arg(long = "polls-out", default_value = "polls.csv")]
    pub polls_out: PathBuf,

    /// Filepath for the aggregated trends CSV.
    #[arg(long = "trends-out", default_value = "trends.csv")]
    pub trends_out: PathBuf,

    /// Write log messages to this file instead of stdout.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG when set).
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,

    /// Mirror log messages to stdout as well as the log file.
    #[arg(short = 'l', long = "log-to-stdout")]
    pub log_to_stdout: bool,
}

impl Cli {
    /// Translate CLI flags into the core aggregation configuration.
    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            candidates: CandidateSelector::from_names(self.candidates.clone()),
            agg_type: self.agg_type,
            increment_days: self.increment_days,
            lead_time: self.lead_time,
            lead_override: self.lead_override && !self.no_lead_override,
            interpolation: self.interpolation,
            from_date: DateBound::from_opt_text(self.from_date.clone()),
            to_date: DateBound::from_opt_text(self.to_date.clone()),
        }
    }
}
