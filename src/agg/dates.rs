//! Date-range resolution, date filtering, and the output grid.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::domain::{DateBound, ObservationSet};
use crate::error::PollError;

/// Resolve the effective `[from, to]` window for a run.
///
/// Omitted bounds derive from the set's earliest/latest observation date.
/// Explicit bounds are returned verbatim even when they fall outside the
/// data's actual range (the grid then contains unobserved dates, to be
/// filled entirely by the trailing-window fallback).
pub fn resolve_date_range(
    set: &ObservationSet,
    from_date: &DateBound,
    to_date: &DateBound,
) -> Result<(NaiveDate, NaiveDate), PollError> {
    let from = match from_date.normalize()? {
        Some(d) => d,
        None => set
            .min_date()
            .ok_or_else(|| PollError::no_data("cannot derive from_date from an empty dataset"))?,
    };
    let to = match to_date.normalize()? {
        Some(d) => d,
        None => set
            .max_date()
            .ok_or_else(|| PollError::no_data("cannot derive to_date from an empty dataset"))?,
    };
    debug!(%from, %to, "resolved date range");
    Ok((from, to))
}

/// Whether `date` falls within the inclusive `[from, to]` range.
/// An omitted bound imposes no restriction on its side.
pub fn date_in_bounds(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
}

/// Return a copy of `set` restricted to the inclusive `[from, to]` range.
///
/// Omitted bounds impose no restriction; with neither bound supplied the
/// input is returned unchanged without inspecting any date.
pub fn filter_by_date(
    set: &ObservationSet,
    from_date: &DateBound,
    to_date: &DateBound,
) -> Result<ObservationSet, PollError> {
    let from = from_date.normalize()?;
    let to = to_date.normalize()?;
    if from.is_none() && to.is_none() {
        return Ok(set.clone());
    }

    let rows = set
        .rows
        .iter()
        .filter(|row| date_in_bounds(row.date, from, to))
        .cloned()
        .collect();
    Ok(ObservationSet {
        candidates: set.candidates.clone(),
        rows,
    })
}

/// Build the regular output grid: `from + k * increment` for `k = 0, 1, ...`
/// while the result is `<= to`. The final date is included only when it lands
/// exactly on a step boundary.
pub fn date_grid(from: NaiveDate, to: NaiveDate, increment_days: u32) -> Vec<NaiveDate> {
    let step = Duration::days(i64::from(increment_days));
    let mut dates = Vec::new();
    let mut current = from;
    while current <= to {
        dates.push(current);
        current += step;
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn set(dates: &[NaiveDate]) -> ObservationSet {
        ObservationSet {
            candidates: vec!["A".to_string()],
            rows: dates
                .iter()
                .map(|&date| Observation {
                    date,
                    values: vec![Some(0.5)],
                })
                .collect(),
        }
    }

    fn three_days() -> ObservationSet {
        set(&[d(2022, 1, 1), d(2022, 1, 2), d(2022, 1, 3)])
    }

    #[test]
    fn resolve_derives_omitted_bounds_from_data() {
        let (from, to) =
            resolve_date_range(&three_days(), &DateBound::Unbounded, &DateBound::Unbounded)
                .unwrap();
        assert_eq!(from, d(2022, 1, 1));
        assert_eq!(to, d(2022, 1, 3));
    }

    #[test]
    fn resolve_accepts_text_and_resolved_mixed() {
        let (from, to) = resolve_date_range(
            &three_days(),
            &DateBound::Unbounded,
            &DateBound::Text("2022-01-03".to_string()),
        )
        .unwrap();
        assert_eq!(from, d(2022, 1, 1));
        assert_eq!(to, d(2022, 1, 3));

        let (from, to) = resolve_date_range(
            &three_days(),
            &DateBound::Text("2022-01-01".to_string()),
            &DateBound::Resolved(d(2022, 1, 3)),
        )
        .unwrap();
        assert_eq!(from, d(2022, 1, 1));
        assert_eq!(to, d(2022, 1, 3));
    }

    #[test]
    fn resolve_returns_out_of_range_bounds_verbatim() {
        let (from, to) = resolve_date_range(
            &three_days(),
            &DateBound::Text("2024-12-31".to_string()),
            &DateBound::Text("2025-01-04".to_string()),
        )
        .unwrap();
        assert_eq!(from, d(2024, 12, 31));
        assert_eq!(to, d(2025, 1, 4));
    }

    #[test]
    fn resolve_bad_text_is_a_parse_error() {
        let err = resolve_date_range(
            &three_days(),
            &DateBound::Text("foo".to_string()),
            &DateBound::Unbounded,
        )
        .unwrap_err();
        assert!(matches!(err, PollError::InvalidDate { ref input } if input == "foo"));
    }

    #[test]
    fn resolve_empty_set_with_omitted_bound_fails() {
        let empty = ObservationSet::default();
        assert!(matches!(
            resolve_date_range(&empty, &DateBound::Unbounded, &DateBound::Unbounded),
            Err(PollError::NoData { .. })
        ));
        assert!(matches!(
            resolve_date_range(
                &empty,
                &DateBound::Text("2022-01-01".to_string()),
                &DateBound::Unbounded
            ),
            Err(PollError::NoData { .. })
        ));
    }

    #[test]
    fn resolve_empty_set_with_both_bounds_succeeds() {
        let empty = ObservationSet::default();
        let (from, to) = resolve_date_range(
            &empty,
            &DateBound::Text("2024-12-31".to_string()),
            &DateBound::Text("2025-01-04".to_string()),
        )
        .unwrap();
        assert_eq!(from, d(2024, 12, 31));
        assert_eq!(to, d(2025, 1, 4));
    }

    #[test]
    fn bounds_predicate_is_inclusive_on_both_ends() {
        let from = Some(d(2023, 1, 2));
        let to = Some(d(2023, 1, 4));
        assert!(!date_in_bounds(d(2023, 1, 1), from, to));
        assert!(date_in_bounds(d(2023, 1, 2), from, to));
        assert!(date_in_bounds(d(2023, 1, 4), from, to));
        assert!(!date_in_bounds(d(2023, 1, 5), from, to));
        assert!(date_in_bounds(d(2023, 1, 5), from, None));
        assert!(date_in_bounds(d(2023, 1, 1), None, to));
    }

    #[test]
    fn filter_applies_inclusive_bounds() {
        let filtered = filter_by_date(
            &three_days(),
            &DateBound::Text("2022-01-02".to_string()),
            &DateBound::Unbounded,
        )
        .unwrap();
        assert!(filtered.rows.iter().all(|r| r.date >= d(2022, 1, 2)));
        assert_eq!(filtered.rows.len(), 2);

        let filtered = filter_by_date(
            &three_days(),
            &DateBound::Resolved(d(2022, 1, 2)),
            &DateBound::Resolved(d(2022, 1, 3)),
        )
        .unwrap();
        assert_eq!(filtered.rows.len(), 2);
        assert!(filtered
            .rows
            .iter()
            .all(|r| r.date >= d(2022, 1, 2) && r.date <= d(2022, 1, 3)));
    }

    #[test]
    fn filter_without_bounds_returns_input_unchanged() {
        let original = three_days();
        let filtered =
            filter_by_date(&original, &DateBound::Unbounded, &DateBound::Unbounded).unwrap();
        assert_eq!(filtered, original);

        // Safe on a completely empty set too.
        let empty = ObservationSet::default();
        let filtered =
            filter_by_date(&empty, &DateBound::Unbounded, &DateBound::Unbounded).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn filter_does_not_mutate_input() {
        let original = three_days();
        let before = original.clone();
        let _ = filter_by_date(
            &original,
            &DateBound::Resolved(d(2022, 1, 3)),
            &DateBound::Unbounded,
        )
        .unwrap();
        assert_eq!(original, before);
    }

    #[test]
    fn filter_bad_bound_text_fails() {
        let err = filter_by_date(
            &three_days(),
            &DateBound::Text("ekasdnjsr42".to_string()),
            &DateBound::Unbounded,
        )
        .unwrap_err();
        assert!(matches!(err, PollError::InvalidDate { .. }));
    }

    #[test]
    fn grid_includes_endpoint_on_step_boundary() {
        let grid = date_grid(d(2023, 1, 1), d(2023, 1, 5), 2);
        assert_eq!(grid, vec![d(2023, 1, 1), d(2023, 1, 3), d(2023, 1, 5)]);
    }

    #[test]
    fn grid_excludes_endpoint_off_step_boundary() {
        let grid = date_grid(d(2023, 1, 1), d(2023, 1, 6), 2);
        assert_eq!(grid, vec![d(2023, 1, 1), d(2023, 1, 3), d(2023, 1, 5)]);
    }

    #[test]
    fn grid_single_day() {
        let grid = date_grid(d(2023, 1, 1), d(2023, 1, 1), 1);
        assert_eq!(grid, vec![d(2023, 1, 1)]);
    }

    #[test]
    fn grid_length_matches_floor_formula() {
        let from = d(2023, 1, 1);
        let to = d(2023, 2, 14);
        for step in [1u32, 3, 7] {
            let grid = date_grid(from, to, step);
            let expected = (to - from).num_days() / i64::from(step) + 1;
            assert_eq!(grid.len() as i64, expected, "step {step}");
        }
    }
}
