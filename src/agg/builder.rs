//! Trend building: one aggregated row per date in the regular output grid.
//!
//! The builder wires the smaller pieces together:
//!
//! 1. validate the candidate selection and restrict the table to it
//! 2. drop pollster/sample columns (aggregation is pollster-agnostic)
//! 3. filter by the user-supplied bounds, then resolve effective bounds from
//!    whatever data survived (omitted bounds default to the filtered extremes)
//! 4. build the regular date grid
//! 5. pre-aggregate exact-date matches
//! 6. fill the grid per the interpolation policy
//! 7. sort by date
//!
//! Grid dates are independent of one another, so step 6 runs in parallel.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::agg::candidates::validate_candidates;
use crate::agg::dates::{date_grid, filter_by_date, resolve_date_range};
use crate::agg::window::{aggregate_columns, aggregate_with_lead_time};
use crate::domain::{
    AggregationConfig, AggType, Interpolation, Observation, ObservationSet, PollTable, TrendPoint,
    TrendSet,
};
use crate::error::PollError;

/// Aggregate a poll table into a regular trend series.
pub fn aggregate_polls(
    table: &PollTable,
    config: &AggregationConfig,
) -> Result<TrendSet, PollError> {
    config.validate()?;

    let names = validate_candidates(table, &config.candidates)?;
    let observations = table.to_observations(&names);

    // Filter on the user-supplied bounds first, so omitted bounds resolve to
    // the extremes of the data that survived any explicit partial filtering.
    // The unfiltered set stays around for the trailing-window fallback: a
    // grid built from out-of-range bounds must still be able to reach back
    // to data outside those bounds.
    let bounded = filter_by_date(&observations, &config.from_date, &config.to_date)?;
    let (from, to) = resolve_date_range(&bounded, &config.from_date, &config.to_date)?;

    info!(
        n_polls = bounded.rows.len(),
        %from,
        %to,
        agg_type = ?config.agg_type,
        interpolation = ?config.interpolation,
        increment_days = config.increment_days,
        lead_time = config.lead_time,
        lead_override = config.lead_override,
        "aggregating polls"
    );

    let exact = aggregate_exact(&bounded, config.agg_type);

    let mut points = match config.interpolation {
        Interpolation::Never => {
            // The exact-match table is the output; the grid is not consulted,
            // so the output's dates may differ from the regular grid.
            debug!("interpolation disabled; returning exact-date aggregates only");
            exact
                .into_iter()
                .map(|(date, values)| TrendPoint { date, values })
                .collect::<Vec<_>>()
        }
        Interpolation::IfMissing => {
            let grid = date_grid(from, to, config.increment_days);
            grid.par_iter()
                .map(|&date| match exact.get(&date) {
                    Some(values) => Ok(TrendPoint {
                        date,
                        values: values.clone(),
                    }),
                    None => aggregate_with_lead_time(
                        &observations,
                        date,
                        config.lead_time,
                        config.lead_override,
                        config.agg_type,
                        false,
                    ),
                })
                .collect::<Result<Vec<_>, _>>()?
        }
        Interpolation::Always => {
            let grid = date_grid(from, to, config.increment_days);
            grid.par_iter()
                .map(|&date| {
                    aggregate_with_lead_time(
                        &observations,
                        date,
                        config.lead_time,
                        config.lead_override,
                        config.agg_type,
                        false,
                    )
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    points.sort_by_key(|p| p.date);

    Ok(TrendSet {
        candidates: names,
        points,
    })
}

/// Group observations by exact date and aggregate each group's columns.
fn aggregate_exact(
    set: &ObservationSet,
    agg_type: AggType,
) -> BTreeMap<NaiveDate, Vec<Option<f64>>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Observation>> = BTreeMap::new();
    for row in &set.rows {
        by_date.entry(row.date).or_default().push(row);
    }
    by_date
        .into_iter()
        .map(|(date, rows)| (date, aggregate_columns(&rows, set.candidates.len(), agg_type)))
        .collect()
}
