//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to CSV
//! - constructed directly in tests without touching the network

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PollError;

/// Statistical aggregate applied within a date group or window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AggType {
    Mean,
    Median,
}

/// When to reach back to preceding days for a grid date.
///
/// - `Never`: only exact-date aggregates are produced. The output is the
///   exact-match table itself, so its dates may differ from the regular grid.
/// - `IfMissing`: exact-date aggregates are copied verbatim; dates without
///   one are filled from the trailing lead-time window.
/// - `Always`: every grid date is computed from the trailing window, even
///   when an exact-date aggregate exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Never,
    IfMissing,
    Always,
}

/// Which candidate columns to aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSelector {
    /// Every candidate column, in the table's native order.
    All,
    /// An explicit list; every name must exist in the table.
    Names(Vec<String>),
}

impl CandidateSelector {
    /// Treat a single name as a singleton list.
    pub fn from_names(names: Vec<String>) -> Self {
        if names.is_empty() {
            CandidateSelector::All
        } else {
            CandidateSelector::Names(names)
        }
    }
}

/// An optional date bound as supplied by the caller.
///
/// Bounds arrive in one of three states: absent, textual (`YYYY-MM-DD`), or
/// already resolved. Public entry points normalize to `Option<NaiveDate>` via
/// [`DateBound::normalize`] so internal logic only ever sees resolved dates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateBound {
    #[default]
    Unbounded,
    Text(String),
    Resolved(NaiveDate),
}

impl DateBound {
    pub fn from_opt_text(text: Option<String>) -> Self {
        match text {
            Some(s) => DateBound::Text(s),
            None => DateBound::Unbounded,
        }
    }

    /// Resolve to a concrete date, or `None` for an unbounded side.
    ///
    /// Textual bounds that fail to parse surface the offending string.
    pub fn normalize(&self) -> Result<Option<NaiveDate>, PollError> {
        match self {
            DateBound::Unbounded => Ok(None),
            DateBound::Text(s) => parse_input_date(s).map(Some),
            DateBound::Resolved(d) => Ok(Some(*d)),
        }
    }
}

/// Parse a user-supplied `YYYY-MM-DD` date.
pub fn parse_input_date(s: &str) -> Result<NaiveDate, PollError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| PollError::InvalidDate {
        input: s.to_string(),
    })
}

/// A full run's configuration as understood by the aggregation core.
///
/// This is derived from CLI flags (plus defaults). The enum fields are closed
/// types, so invalid aggregate/interpolation values cannot reach the core.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    pub candidates: CandidateSelector,
    pub agg_type: AggType,
    /// Grid step in days (must be positive).
    pub increment_days: u32,
    /// Width of the trailing window, in days.
    pub lead_time: u32,
    /// Whether to widen an empty window until it reaches data.
    pub lead_override: bool,
    pub interpolation: Interpolation,
    pub from_date: DateBound,
    pub to_date: DateBound,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            candidates: CandidateSelector::All,
            agg_type: AggType::Mean,
            increment_days: 1,
            lead_time: 1,
            lead_override: true,
            interpolation: Interpolation::IfMissing,
            from_date: DateBound::Unbounded,
            to_date: DateBound::Unbounded,
        }
    }
}

impl AggregationConfig {
    /// Reject bad options before any data is fetched or touched.
    pub fn validate(&self) -> Result<(), PollError> {
        if self.increment_days == 0 {
            return Err(PollError::InvalidConfig {
                field: "increment_days",
                message: "must be a positive number of days".to_string(),
            });
        }
        self.from_date.normalize()?;
        self.to_date.normalize()?;
        Ok(())
    }
}

/// One normalized poll: a dated row with per-candidate proportions.
///
/// `values` is aligned with the owning table's candidate list. `None` marks a
/// missing reading, which is distinct from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRow {
    pub date: NaiveDate,
    pub pollster: String,
    pub sample_size: Option<u32>,
    pub values: Vec<Option<f64>>,
}

/// Normalized poll observations: candidate columns plus dated rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollTable {
    /// Candidate column names, in the source table's native order.
    pub candidates: Vec<String>,
    pub rows: Vec<PollRow>,
}

impl PollTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a candidate column, if present.
    pub fn candidate_index(&self, name: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c == name)
    }

    /// Drop pollster/sample columns and restrict to the named candidates.
    ///
    /// Callers must have validated `names` first; unknown names are skipped.
    pub fn to_observations(&self, names: &[String]) -> ObservationSet {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|n| self.candidate_index(n))
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| Observation {
                date: row.date,
                values: indices.iter().map(|&i| row.values[i]).collect(),
            })
            .collect();
        ObservationSet {
            candidates: names.to_vec(),
            rows,
        }
    }
}

/// One pollster-agnostic observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// The aggregation core's input: dated per-candidate readings only.
///
/// Built once per run and never mutated during aggregation, so it can be
/// shared across parallel per-date computations without synchronization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationSet {
    pub candidates: Vec<String>,
    pub rows: Vec<Observation>,
}

impl ObservationSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).min()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).max()
    }
}

/// Aggregated values for a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Aligned with the owning set's candidate list; `None` = no data.
    pub values: Vec<Option<f64>>,
}

impl TrendPoint {
    /// A point with every candidate missing.
    pub fn missing(date: NaiveDate, n_candidates: usize) -> Self {
        Self {
            date,
            values: vec![None; n_candidates],
        }
    }
}

/// The trend series: one point per output date, sorted ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendSet {
    pub candidates: Vec<String>,
    pub points: Vec<TrendPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_bound_normalizes_all_states() {
        assert_eq!(DateBound::Unbounded.normalize().unwrap(), None);
        assert_eq!(
            DateBound::Text("2023-01-02".to_string()).normalize().unwrap(),
            Some(d(2023, 1, 2))
        );
        assert_eq!(
            DateBound::Resolved(d(2023, 1, 2)).normalize().unwrap(),
            Some(d(2023, 1, 2))
        );
    }

    #[test]
    fn date_bound_bad_text_names_input() {
        let err = DateBound::Text("ekasdnjsr42".to_string())
            .normalize()
            .unwrap_err();
        assert!(matches!(err, PollError::InvalidDate { ref input } if input == "ekasdnjsr42"));
    }

    #[test]
    fn zero_increment_is_rejected() {
        let config = AggregationConfig {
            increment_days: 0,
            ..AggregationConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            PollError::InvalidConfig {
                field: "increment_days",
                ..
            }
        ));
    }

    #[test]
    fn validate_catches_bad_date_bounds_early() {
        let config = AggregationConfig {
            from_date: DateBound::Text("not-a-date".to_string()),
            ..AggregationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PollError::InvalidDate { .. })
        ));
    }

    #[test]
    fn to_observations_drops_pollster_and_reorders() {
        let table = PollTable {
            candidates: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            rows: vec![PollRow {
                date: d(2023, 1, 1),
                pollster: "Acme".to_string(),
                sample_size: Some(500),
                values: vec![Some(0.4), Some(0.3), None],
            }],
        };
        let obs = table.to_observations(&["C".to_string(), "A".to_string()]);
        assert_eq!(obs.candidates, vec!["C", "A"]);
        assert_eq!(obs.rows[0].values, vec![None, Some(0.4)]);
    }
}
