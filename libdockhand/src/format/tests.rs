use super::*;
use chrono::Duration;

#[test]
fn test_format_size_decimal_units() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(1000), "1 kB");
    assert_eq!(format_size(187_000_000), "187 MB");
}

#[test]
fn test_format_timestamp_relative() {
    let three_days_ago = Utc::now() - Duration::days(3);
    assert_eq!(format_timestamp(&three_days_ago), "3 days ago");
}

#[test]
fn test_missing_values_render_as_dash() {
    assert_eq!(size_or_dash(None), "-");
    assert_eq!(age_or_dash(None), "-");
    assert_eq!(size_or_dash(Some(2000)), "2 kB");
}
