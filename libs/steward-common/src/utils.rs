//! Utility functions shared across the Steward workspace

use chrono::{DateTime, NaiveDate, Utc};

use crate::constants::DATE_FORMATS;

/// Format a date for display
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a datetime for display
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parse a date string, trying each of [`DATE_FORMATS`] in order
///
/// # Errors
/// Returns `chrono::ParseError` if the string matches none of the
/// supported formats
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(date);
        }
    }
    // Surface the canonical format's error
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Truncate a string to a maximum length
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        assert_eq!(format_date(&date), "2023-12-25");
    }

    #[test]
    fn test_format_date_edge_cases() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date(&date), "2024-01-01");

        // Leap year
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format_date(&date), "2024-02-29");
    }

    #[test]
    fn test_format_datetime_specific() {
        let dt = DateTime::parse_from_rfc3339("2023-12-25T15:30:45Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_datetime(&dt), "2023-12-25 15:30:45 UTC");
    }

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2023-12-25").unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 12);
        assert_eq!(date.day(), 25);
    }

    #[test]
    fn test_parse_date_alternate_formats() {
        // Formats are tried in declaration order
        assert_eq!(
            parse_date("12/25/2023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
        // Day-first only wins when month-first cannot parse
        assert_eq!(
            parse_date("25/12/2023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("2023-13-01").is_err());
        assert!(parse_date("2023-02-30").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_format_parse_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let formatted = format_date(&date);
        let parsed = parse_date(&formatted).unwrap();
        assert_eq!(date, parsed);
    }

    #[test]
    fn test_truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("this is a very long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_string_edge_cases() {
        assert_eq!(truncate_string("hello", 0), "...");
        assert_eq!(truncate_string("hello", 3), "...");
        assert_eq!(truncate_string("hello", 4), "h...");
        assert_eq!(truncate_string("", 10), "");
    }
}
