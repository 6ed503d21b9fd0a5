//! Human-readable sizes and ages for hub metadata.

use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use humansize::{DECIMAL, format_size as format_size_human};

#[cfg(test)]
mod tests;

/// Formats a byte count with decimal units, the way the hub reports sizes.
///
/// # Examples
///
/// ```
/// use libdockhand::format::format_size;
///
/// assert_eq!(format_size(1000), "1 kB");
/// assert_eq!(format_size(5 * 1000 * 1000), "5 MB");
/// ```
pub fn format_size(size_bytes: u64) -> String {
    format_size_human(size_bytes, DECIMAL)
}

/// Formats a timestamp relative to now ("2 days ago").
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.humanize()
}

/// Size column text, `-` when the hub did not report one.
pub fn size_or_dash(size_bytes: Option<u64>) -> String {
    size_bytes.map(format_size).unwrap_or_else(|| "-".to_string())
}

/// Age column text, `-` when the hub did not report one.
pub fn age_or_dash(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string())
}
