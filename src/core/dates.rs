//! Calendar date strings
//!
//! All dates in the toolkit are stored and compared as `YYYY-MM-DD` strings in
//! local time. Because the format is fixed-width and zero-padded, comparing two
//! date strings lexicographically gives the same answer as comparing them
//! chronologically.
//!
//! Display formatting decomposes the string by hand instead of going through a
//! timestamp, so a date is never shifted across a UTC offset boundary.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

/// Canonical calendar date pattern
static CALENDAR_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static pattern"));

/// Rendered for a missing date
pub const MISSING_DATE: &str = "-";

/// Errors raised when validating operator-entered dates
#[derive(Debug, Error, Diagnostic)]
pub enum DateError {
    #[error("{label} '{value}' is not a date in YYYY-MM-DD form")]
    #[diagnostic(code(lqc::date::format), help("use a date like 2025-05-19"))]
    NotCanonical { label: String, value: String },

    #[error("{label} '{value}' is not a real calendar date")]
    #[diagnostic(code(lqc::date::impossible))]
    Impossible { label: String, value: String },

    #[error("{label} '{value}' is in the future (today is {today})")]
    #[diagnostic(code(lqc::date::future))]
    Future {
        label: String,
        value: String,
        today: String,
    },
}

/// Today's local date as a typed value
pub fn today_date() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's local wall-clock date as `YYYY-MM-DD`
///
/// Built from the local year/month/day, never from a UTC conversion.
pub fn today() -> String {
    to_calendar_string(today_date())
}

/// Render a typed date as a calendar date string
pub fn to_calendar_string(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Check whether a string has the canonical `YYYY-MM-DD` shape
///
/// Only the shape is checked; `2025-02-30` passes.
pub fn is_calendar_date(s: &str) -> bool {
    CALENDAR_DATE.is_match(s)
}

/// Parse a canonical date string into a typed date
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if !is_calendar_date(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// True if `date` is after today
pub fn is_future(date: &str) -> bool {
    is_future_relative(date, &today())
}

/// True if `date` sorts after `today`
pub fn is_future_relative(date: &str, today: &str) -> bool {
    date > today
}

/// Format a calendar date for display as `M/D/YYYY`
///
/// Canonical input is split into its numeric parts directly. Anything else gets
/// a best-effort parse; if that fails too the input is returned untouched.
/// `None` and blank input render as `-`.
pub fn format_for_display(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING_DATE.to_string();
    };

    if is_calendar_date(raw) {
        // Shape is guaranteed by the pattern, so every slice is all digits
        let year: u32 = raw[0..4].parse().unwrap_or_default();
        let month: u32 = raw[5..7].parse().unwrap_or_default();
        let day: u32 = raw[8..10].parse().unwrap_or_default();
        return render_display(year as i32, month, day);
    }

    match parse_loose(raw) {
        Some(d) => render_display(d.year(), d.month(), d.day()),
        None => raw.to_string(),
    }
}

/// Parse a `M/D/YYYY` display string back to `YYYY-MM-DD`
pub fn parse_display(s: &str) -> Option<String> {
    let mut parts = s.trim().split('/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || year > 9999 {
        return None;
    }
    Some(format!("{:04}-{:02}-{:02}", year, month, day))
}

/// Validate an operator-entered date: canonical, real, and not in the future
pub fn require_past_or_today(label: &str, value: &str) -> Result<(), DateError> {
    require_past_or_today_relative(label, value, &today())
}

/// Same as [`require_past_or_today`] against an explicit `today`
pub fn require_past_or_today_relative(
    label: &str,
    value: &str,
    today: &str,
) -> Result<(), DateError> {
    if !is_calendar_date(value) {
        return Err(DateError::NotCanonical {
            label: label.to_string(),
            value: value.to_string(),
        });
    }
    if parse_calendar_date(value).is_none() {
        return Err(DateError::Impossible {
            label: label.to_string(),
            value: value.to_string(),
        });
    }
    if is_future_relative(value, today) {
        return Err(DateError::Future {
            label: label.to_string(),
            value: value.to_string(),
            today: today.to_string(),
        });
    }
    Ok(())
}

fn render_display(year: i32, month: u32, day: u32) -> String {
    format!("{}/{}/{:04}", month, day, year)
}

/// Best-effort parse of non-canonical input, keeping the date as written
fn parse_loose(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        // The date in the timestamp's own offset, not converted
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_is_canonical() {
        let t = today();
        assert!(is_calendar_date(&t), "today() returned {}", t);
        assert_eq!(t, to_calendar_string(Local::now().date_naive()));
    }

    #[test]
    fn test_is_calendar_date() {
        assert!(is_calendar_date("2025-05-19"));
        assert!(is_calendar_date("2025-02-30"));
        assert!(!is_calendar_date("2025-5-19"));
        assert!(!is_calendar_date("5/19/2025"));
        assert!(!is_calendar_date(" 2025-05-19"));
        assert!(!is_calendar_date(""));
    }

    #[test]
    fn test_is_future_relative() {
        assert!(is_future_relative("2025-05-20", "2025-05-19"));
        assert!(!is_future_relative("2025-05-19", "2025-05-19"));
        assert!(!is_future_relative("2024-12-31", "2025-01-01"));
        assert!(is_future_relative("2026-01-01", "2025-12-31"));
    }

    #[test]
    fn test_is_future_agrees_with_chronology() {
        let dates = [
            "1999-12-31",
            "2000-01-01",
            "2024-02-29",
            "2025-01-09",
            "2025-01-10",
            "2025-10-01",
            "2025-12-31",
        ];
        for a in dates {
            for b in dates {
                let chrono_after =
                    parse_calendar_date(a).unwrap() > parse_calendar_date(b).unwrap();
                assert_eq!(is_future_relative(a, b), chrono_after, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_is_future_against_clock() {
        let tomorrow = to_calendar_string(today_date().succ_opt().unwrap());
        let yesterday = to_calendar_string(today_date().pred_opt().unwrap());
        assert!(is_future(&tomorrow));
        assert!(!is_future(&today()));
        assert!(!is_future(&yesterday));
    }

    #[test]
    fn test_format_for_display_canonical() {
        assert_eq!(format_for_display(Some("2025-05-19")), "5/19/2025");
        assert_eq!(format_for_display(Some("2025-01-01")), "1/1/2025");
        assert_eq!(format_for_display(Some("2024-12-31")), "12/31/2024");
    }

    #[test]
    fn test_format_for_display_missing() {
        assert_eq!(format_for_display(None), "-");
        assert_eq!(format_for_display(Some("")), "-");
        assert_eq!(format_for_display(Some("   ")), "-");
    }

    #[test]
    fn test_format_for_display_fallbacks() {
        // Late-evening timestamp with a negative offset keeps its own date
        assert_eq!(
            format_for_display(Some("2025-01-01T23:30:00-08:00")),
            "1/1/2025"
        );
        assert_eq!(
            format_for_display(Some("2025-03-04T00:15:00Z")),
            "3/4/2025"
        );
        assert_eq!(format_for_display(Some("2025-03-04 08:00:00")), "3/4/2025");
        assert_eq!(format_for_display(Some("2025-3-4")), "3/4/2025");
        assert_eq!(format_for_display(Some("not a date")), "not a date");
    }

    #[test]
    fn test_display_round_trip_keeps_day() {
        let mut d = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        while d <= end {
            let canonical = to_calendar_string(d);
            let shown = format_for_display(Some(&canonical));
            assert_eq!(parse_display(&shown).as_deref(), Some(canonical.as_str()));
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_parse_display_rejects_garbage() {
        assert_eq!(parse_display("5/19"), None);
        assert_eq!(parse_display("5/19/2025/1"), None);
        assert_eq!(parse_display("a/b/c"), None);
    }

    #[test]
    fn test_require_past_or_today() {
        let today = "2025-05-19";
        assert!(require_past_or_today_relative("prepared", "2025-05-19", today).is_ok());
        assert!(require_past_or_today_relative("prepared", "2025-05-01", today).is_ok());
        assert!(matches!(
            require_past_or_today_relative("prepared", "2025-05-20", today),
            Err(DateError::Future { .. })
        ));
        assert!(matches!(
            require_past_or_today_relative("prepared", "5/19/2025", today),
            Err(DateError::NotCanonical { .. })
        ));
        assert!(matches!(
            require_past_or_today_relative("prepared", "2025-02-30", today),
            Err(DateError::Impossible { .. })
        ));
    }
}
