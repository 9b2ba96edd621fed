//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration enums (`AggType`, `Interpolation`) and the resolved
//!   per-run `AggregationConfig`
//! - the normalized poll table (`PollTable`) and its pollster-agnostic
//!   aggregation view (`ObservationSet`)
//! - aggregation outputs (`TrendPoint`, `TrendSet`)

pub mod types;

pub use types::*;
