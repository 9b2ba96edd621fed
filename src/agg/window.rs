//! Trailing-window aggregation for a single target date.
//!
//! Given a target date with no exact observations, we look back over a
//! trailing window of `lead_time` days and aggregate whatever falls inside
//! it. With `lead_override` the window grows a day at a time until it
//! reaches data; the growth stops once the window start precedes the
//! earliest observation, so a target date before all data terminates with an
//! all-missing point instead of looping.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::domain::{AggType, Observation, ObservationSet, TrendPoint};
use crate::error::PollError;

/// Aggregate observations in the trailing window `[target - lead_time, target]`.
///
/// Behavior on an empty window:
/// - the whole set is empty: all-missing point, or a no-data error when
///   `fail_on_empty` is set (single-date diagnostic queries opt into this)
/// - `lead_override`: widen the window until it contains data (capped at the
///   earliest observation)
/// - otherwise: all-missing point, no error
pub fn aggregate_with_lead_time(
    set: &ObservationSet,
    target: NaiveDate,
    lead_time: u32,
    lead_override: bool,
    agg_type: AggType,
    fail_on_empty: bool,
) -> Result<TrendPoint, PollError> {
    if set.is_empty() {
        if fail_on_empty {
            return Err(PollError::no_data(format!(
                "no observations to aggregate for {target}"
            )));
        }
        return Ok(TrendPoint::missing(target, set.candidates.len()));
    }

    let mut lead = i64::from(lead_time);
    let mut selected = select_window(set, target, lead);

    if selected.is_empty() && lead_override {
        // Guaranteed non-empty set, so this terminates: either the window
        // reaches the earliest observation, or the target predates all data
        // and the cap trips with nothing selected.
        let earliest = set.min_date().unwrap_or(target);
        while selected.is_empty() && target - Duration::days(lead) > earliest {
            lead += 1;
            selected = select_window(set, target, lead);
        }
        if !selected.is_empty() {
            debug!(%target, lead, "widened lead-time window until data was found");
        }
    }

    if selected.is_empty() {
        return Ok(TrendPoint::missing(target, set.candidates.len()));
    }

    let values = aggregate_columns(&selected, set.candidates.len(), agg_type);
    Ok(TrendPoint {
        date: target,
        values,
    })
}

fn select_window<'a>(
    set: &'a ObservationSet,
    target: NaiveDate,
    lead_days: i64,
) -> Vec<&'a Observation> {
    let start = target - Duration::days(lead_days);
    set.rows
        .iter()
        .filter(|row| row.date >= start && row.date <= target)
        .collect()
}

/// Per-candidate aggregate over a set of rows, ignoring missing values
/// per column independently. A column with no present values stays missing.
pub(crate) fn aggregate_columns(
    rows: &[&Observation],
    n_candidates: usize,
    agg_type: AggType,
) -> Vec<Option<f64>> {
    (0..n_candidates)
        .map(|i| {
            let present: Vec<f64> = rows.iter().filter_map(|row| row.values[i]).collect();
            aggregate_values(&present, agg_type)
        })
        .collect()
}

fn aggregate_values(values: &[f64], agg_type: AggType) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    match agg_type {
        AggType::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        AggType::Median => Some(median(values)),
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Three candidates, one poll per day over 2023-01-01..03.
    fn polls() -> ObservationSet {
        ObservationSet {
            candidates: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            rows: vec![
                Observation {
                    date: d(2023, 1, 1),
                    values: vec![Some(0.40), Some(0.30), Some(0.20)],
                },
                Observation {
                    date: d(2023, 1, 2),
                    values: vec![Some(0.50), Some(0.40), Some(0.30)],
                },
                Observation {
                    date: d(2023, 1, 3),
                    values: vec![Some(0.60), Some(0.50), Some(0.40)],
                },
            ],
        }
    }

    #[test]
    fn empty_set_returns_all_missing() {
        let empty = ObservationSet {
            candidates: vec!["A".to_string(), "B".to_string()],
            rows: vec![],
        };
        let point =
            aggregate_with_lead_time(&empty, d(2023, 1, 1), 1, true, AggType::Mean, false)
                .unwrap();
        assert_eq!(point.values, vec![None, None]);
    }

    #[test]
    fn empty_set_with_fail_on_empty_errors() {
        let empty = ObservationSet {
            candidates: vec!["A".to_string()],
            rows: vec![],
        };
        let err = aggregate_with_lead_time(&empty, d(2023, 1, 1), 1, true, AggType::Mean, true)
            .unwrap_err();
        assert!(matches!(err, PollError::NoData { .. }));
    }

    #[test]
    fn no_data_in_window_without_override_is_missing() {
        let point =
            aggregate_with_lead_time(&polls(), d(2024, 5, 1), 7, false, AggType::Mean, false)
                .unwrap();
        assert!(point.values.iter().all(Option::is_none));
    }

    #[test]
    fn override_widens_until_data_is_found() {
        let point =
            aggregate_with_lead_time(&polls(), d(2024, 5, 1), 7, true, AggType::Mean, false)
                .unwrap();
        assert_eq!(point.date, d(2024, 5, 1));
        // Growth stops at the first non-empty window, which reaches back
        // exactly to the latest poll.
        assert_eq!(point.values[0], Some(0.60));
        assert_eq!(point.values[1], Some(0.50));
        assert_eq!(point.values[2], Some(0.40));
    }

    #[test]
    fn target_before_all_data_stays_missing_even_with_override() {
        // A trailing window can never reach observations in the future, so
        // the expansion cap must trip and the point stays missing.
        let point =
            aggregate_with_lead_time(&polls(), d(2022, 1, 1), 7, true, AggType::Mean, false)
                .unwrap();
        assert!(point.values.iter().all(Option::is_none));
    }

    #[test]
    fn mean_and_median_over_window() {
        let mean =
            aggregate_with_lead_time(&polls(), d(2023, 1, 3), 2, false, AggType::Mean, false)
                .unwrap();
        let median =
            aggregate_with_lead_time(&polls(), d(2023, 1, 3), 2, false, AggType::Median, false)
                .unwrap();
        for point in [&mean, &median] {
            for (value, want) in point.values.iter().zip([0.50, 0.40, 0.30]) {
                assert!((value.unwrap() - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn zero_window_equals_exact_match_or_missing() {
        // With data on the target date, a width-0 window reproduces it.
        let point =
            aggregate_with_lead_time(&polls(), d(2023, 1, 2), 0, false, AggType::Mean, false)
                .unwrap();
        assert_eq!(point.values, vec![Some(0.50), Some(0.40), Some(0.30)]);

        // Without data on the target date (and no override), missing.
        let point =
            aggregate_with_lead_time(&polls(), d(2023, 1, 4), 0, false, AggType::Mean, false)
                .unwrap();
        assert!(point.values.iter().all(Option::is_none));
    }

    #[test]
    fn missing_values_skipped_per_candidate() {
        let set = ObservationSet {
            candidates: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                Observation {
                    date: d(2023, 1, 1),
                    values: vec![Some(0.40), None],
                },
                Observation {
                    date: d(2023, 1, 2),
                    values: vec![Some(0.60), None],
                },
            ],
        };
        let point = aggregate_with_lead_time(&set, d(2023, 1, 2), 3, false, AggType::Mean, false)
            .unwrap();
        // A is averaged over its present values; B is missing alone.
        assert!((point.values[0].unwrap() - 0.50).abs() < 1e-12);
        assert_eq!(point.values[1], None);
    }

    #[test]
    fn median_even_count_averages_middle_pair() {
        assert!((median(&[0.1, 0.2, 0.3, 0.4]) - 0.25).abs() < 1e-12);
        assert!((median(&[0.3, 0.1]) - 0.2).abs() < 1e-12);
        assert_eq!(median(&[0.7]), 0.7);
    }
}
