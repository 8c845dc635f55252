//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Format a date for RSS `<pubDate>` elements
pub fn date_rfc2822<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc2822()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Local};

    #[test]
    fn test_format_date() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-05");
        assert_eq!(format_date(&date, "MMMM DD, YYYY"), "January 05, 2024");
        assert_eq!(format_date(&date, "HH:mm:ss"), "10:30:00");
    }

    #[test]
    fn test_date_xml() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let date = tz.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(date_xml(&date), "2024-01-05T10:30:00.000+01:00");
    }

    #[test]
    fn test_date_rfc2822() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let date = tz.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(date_rfc2822(&date), "Fri, 5 Jan 2024 10:30:00 +0000");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("MMMM DD, YYYY"), "%B %d, %Y");
    }
}
