//! Shared pipeline logic: fetch -> normalize -> aggregate.
//!
//! Keeping this in one place means the binary only deals with presentation
//! (flags, output paths) and tests can run the full workflow from a
//! pre-fetched raw table without touching the network.

use tracing::{info, warn};

use crate::agg::date_in_bounds;
use crate::data::{PollsClient, RawTable};
use crate::domain::{AggregationConfig, PollTable, TrendSet};
use crate::error::PollError;
use crate::io::normalize::normalize_polls;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The normalized poll table (written to the polls CSV).
    pub polls: PollTable,
    /// The aggregated trend series (written to the trends CSV).
    pub trends: TrendSet,
}

/// Execute the full pipeline against the configured source URL.
pub fn run(config: &AggregationConfig) -> Result<RunOutput, PollError> {
    let client = PollsClient::from_env()?;
    let raw = client.fetch_raw_table()?;
    run_with_table(config, &raw)
}

/// Execute the pipeline with a pre-fetched raw table.
pub fn run_with_table(config: &AggregationConfig, raw: &RawTable) -> Result<RunOutput, PollError> {
    let normalized = normalize_polls(raw)?;
    for err in &normalized.row_errors {
        warn!(row = err.row, "{}", err.message);
    }

    // The raw poll export honors the date bounds too, mirroring the
    // aggregation's own filtering.
    let polls = filter_polls(&normalized.table, config)?;
    info!(n_polls = polls.rows.len(), "polls ready for aggregation");

    let trends = crate::agg::aggregate_polls(&polls, config)?;

    Ok(RunOutput { polls, trends })
}

/// Restrict the normalized table to the configured date bounds.
fn filter_polls(table: &PollTable, config: &AggregationConfig) -> Result<PollTable, PollError> {
    let from = config.from_date.normalize()?;
    let to = config.to_date.normalize()?;
    if from.is_none() && to.is_none() {
        return Ok(table.clone());
    }
    let rows = table
        .rows
        .iter()
        .filter(|row| date_in_bounds(row.date, from, to))
        .cloned()
        .collect();
    Ok(PollTable {
        candidates: table.candidates.clone(),
        rows,
    })
}
