//! Input/output helpers.
//!
//! - raw-table normalization (`normalize`)
//! - CSV exports (`export`)

pub mod export;
pub mod normalize;

pub use export::{write_polls_csv, write_trends_csv};
pub use normalize::{normalize_polls, NormalizedPolls, RowError};
