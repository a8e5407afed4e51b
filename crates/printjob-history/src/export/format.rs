//! Human formatting shared by the list view and the CSV export.

use std::fmt::Write;

use chrono::{Duration, NaiveDateTime};

use crate::error::HistoryError;

/// Display format for start and end timestamps (`dd.mm.yyyy hh:mm`).
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn format_display_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}

/// Parses a `dd.mm.yyyy hh:mm` value submitted by a client.
pub fn parse_display_timestamp(field: &str, value: &str) -> Result<NaiveDateTime, HistoryError> {
    NaiveDateTime::parse_from_str(value.trim(), DISPLAY_TIMESTAMP_FORMAT).map_err(|e| {
        HistoryError::Parse {
            field: field.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Compact duration such as `1h30m` or `2d0h5m`, at minute resolution.
///
/// Negative durations (clock adjustments) render as `0m`.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    let mut out = String::new();
    if days > 0 {
        let _ = write!(out, "{}d", days);
    }
    if days > 0 || hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    let _ = write!(out, "{}m", minutes);
    out
}

/// Filament length with two decimals.
pub fn format_length(length_mm: f64) -> String {
    format!("{:.2}", length_mm)
}
