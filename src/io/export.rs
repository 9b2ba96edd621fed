//! CSV export for the normalized polls and the aggregated trends.
//!
//! Both files are meant to be easy to consume in spreadsheets or downstream
//! scripts: dates as `YYYY-MM-DD`, missing values as empty cells.

use std::path::Path;

use tracing::info;

use crate::domain::{PollTable, TrendSet};
use crate::error::PollError;

/// Write the normalized poll table (one row per poll).
pub fn write_polls_csv(path: &Path, table: &PollTable) -> Result<(), PollError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["date".to_string(), "pollster".to_string(), "n".to_string()];
    header.extend(table.candidates.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![
            row.date.to_string(),
            row.pollster.clone(),
            row.sample_size.map(|n| n.to_string()).unwrap_or_default(),
        ];
        record.extend(row.values.iter().map(format_value));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(PollError::Io)?;
    info!(path = %path.display(), n_rows = table.rows.len(), "wrote polls csv");
    Ok(())
}

/// Write the trend series (one row per output date).
pub fn write_trends_csv(path: &Path, trends: &TrendSet) -> Result<(), PollError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["date".to_string()];
    header.extend(trends.candidates.iter().cloned());
    writer.write_record(&header)?;

    for point in &trends.points {
        let mut record = vec![point.date.to_string()];
        record.extend(point.values.iter().map(format_value));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(PollError::Io)?;
    info!(path = %path.display(), n_points = trends.points.len(), "wrote trends csv");
    Ok(())
}

fn format_value(value: &Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}
