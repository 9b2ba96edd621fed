//! Raw-table normalization.
//!
//! This module turns the heterogeneous cells of the fetched poll table into
//! a typed `PollTable`:
//!
//! - base columns `Date`, `Pollster`, `Sample` renamed to `date`, `pollster`, `n`
//! - dates parsed from the source's `MM/DD/YY` format
//! - sample sizes stripped of non-digit characters
//! - every other column treated as a candidate series: stripped to digits
//!   and `.`, parsed as a percentage and converted to a proportion
//!
//! Malformed cells become missing rather than erroring; a row whose date is
//! unusable is skipped and reported as a row-level error. The only hard
//! failures here are missing base columns (schema check).

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::data::RawTable;
use crate::domain::{PollRow, PollTable};
use crate::error::PollError;

/// Source date format (e.g. `10/24/23`).
const DATE_FORMAT: &str = "%m/%d/%y";

/// A row-level problem encountered during normalization.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based data row number (excluding the header).
    pub row: usize,
    pub message: String,
}

/// Normalization output: the typed table plus any skipped-row reports.
#[derive(Debug, Clone)]
pub struct NormalizedPolls {
    pub table: PollTable,
    pub row_errors: Vec<RowError>,
}

/// Normalize a fetched raw table into a typed `PollTable`.
pub fn normalize_polls(raw: &RawTable) -> Result<NormalizedPolls, PollError> {
    let date_idx = find_column(raw, "date").ok_or(PollError::MissingColumn { name: "Date" })?;
    let pollster_idx =
        find_column(raw, "pollster").ok_or(PollError::MissingColumn { name: "Pollster" })?;
    let sample_idx =
        find_column(raw, "sample").ok_or(PollError::MissingColumn { name: "Sample" })?;

    let base = [date_idx, pollster_idx, sample_idx];
    let candidate_indices: Vec<usize> = (0..raw.headers.len())
        .filter(|i| !base.contains(i))
        .collect();
    let candidates: Vec<String> = candidate_indices
        .iter()
        .map(|&i| raw.headers[i].clone())
        .collect();
    info!(candidates = ?candidates, "candidates found");

    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut row_errors = Vec::new();

    for (idx, cells) in raw.rows.iter().enumerate() {
        let row_no = idx + 1;
        let date_cell = cells.get(date_idx).map(String::as_str).unwrap_or("");
        let date = match NaiveDate::parse_from_str(date_cell.trim(), DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => {
                warn!(row = row_no, cell = date_cell, "skipping row with unparseable date");
                row_errors.push(RowError {
                    row: row_no,
                    message: format!("unparseable date '{date_cell}'"),
                });
                continue;
            }
        };

        let pollster = cells
            .get(pollster_idx)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let sample_size = parse_sample_size(cells.get(sample_idx).map(String::as_str).unwrap_or(""));
        let values = candidate_indices
            .iter()
            .map(|&i| parse_percentage(cells.get(i).map(String::as_str).unwrap_or("")))
            .collect();

        rows.push(PollRow {
            date,
            pollster,
            sample_size,
            values,
        });
    }

    info!(
        n_rows = rows.len(),
        n_skipped = row_errors.len(),
        "normalized poll table"
    );

    Ok(NormalizedPolls {
        table: PollTable { candidates, rows },
        row_errors,
    })
}

fn find_column(raw: &RawTable, canonical: &str) -> Option<usize> {
    raw.headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(canonical))
}

/// Strip non-digit characters and parse what remains; empty = missing.
fn parse_sample_size(cell: &str) -> Option<u32> {
    let digits: String = cell.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Strip everything except digits and `.`, parse as a percentage, and
/// convert to a proportion. Anything unusable is missing, never an error.
fn parse_percentage(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some(value / 100.0)
}
