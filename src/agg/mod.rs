//! The aggregation core: windowing, fallback search, and trend building.
//!
//! - date-range resolution, date filtering, output grid (`dates`)
//! - candidate selection/validation (`candidates`)
//! - trailing-window aggregation for a single date (`window`)
//! - the per-grid-date trend builder (`builder`)

pub mod builder;
pub mod candidates;
pub mod dates;
pub mod window;

pub use builder::aggregate_polls;
pub use candidates::validate_candidates;
pub use dates::{date_grid, date_in_bounds, filter_by_date, resolve_date_range};
pub use window::aggregate_with_lead_time;
