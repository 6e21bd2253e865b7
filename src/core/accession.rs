//! Accession range expressions
//!
//! Operators enter a batch of cases as a compact range expression such as
//! `1,3,5-7`. Each number is a sequence within the year and is expanded to a
//! full accession like `CN25-005`.
//!
//! Grammar: comma-separated segments, each either a positive integer or two
//! positive integers joined by `-` with start <= end. Whitespace around
//! segments and around the `-` is ignored.

use chrono::{Datelike, NaiveDate};
use miette::Diagnostic;
use thiserror::Error;

use crate::core::dates;

/// Accession prefix tag before the two-digit year
pub const ACCESSION_TAG: &str = "CN";

/// Minimum width of the zero-padded sequence number
pub const SEQUENCE_WIDTH: usize = 3;

/// Errors from expanding a range expression
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RangeError {
    #[error("range expression is empty")]
    #[diagnostic(code(lqc::range::empty), help("enter numbers like 1,3,5-7"))]
    Empty,

    #[error("segment {position} ('{segment}') is not a number or a start-end range")]
    #[diagnostic(
        code(lqc::range::segment),
        help("each comma-separated part must be a positive number like 12 or a range like 10-15")
    )]
    InvalidSegment { segment: String, position: usize },

    #[error("segment {position} ('{segment}') runs backwards: {start} is greater than {end}")]
    #[diagnostic(code(lqc::range::descending), help("write the lower number first"))]
    Descending {
        segment: String,
        position: usize,
        start: u32,
        end: u32,
    },
}

/// One parsed segment of a range expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Single(u32),
    Span(u32, u32),
}

/// Accession prefix for a date string, e.g. `CN25-`
///
/// A missing or unparseable date falls back to today.
pub fn generate_prefix(date: Option<&str>) -> String {
    let date = date
        .map(str::trim)
        .and_then(|s| {
            dates::parse_calendar_date(s)
                .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        })
        .unwrap_or_else(dates::today_date);
    prefix_for_date(date)
}

/// Accession prefix for a typed date
pub fn prefix_for_date(date: NaiveDate) -> String {
    format!("{}{:02}-", ACCESSION_TAG, date.year().rem_euclid(100))
}

/// Pad a sequence number with zeros to at least `width` digits
///
/// Longer numbers are left as they are.
pub fn zero_pad(n: u32, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

/// Check a range expression without expanding it
pub fn validate_range(expr: &str) -> bool {
    parse_segments(expr).is_ok()
}

/// Expand a range expression into full accession identifiers
///
/// Order follows the segments left to right, ascending within each range.
/// Nothing is returned for a malformed expression; the error names the first
/// bad segment.
pub fn parse_range(expr: &str, prefix: &str) -> Result<Vec<String>, RangeError> {
    let segments = parse_segments(expr)?;

    let mut accessions = Vec::new();
    for segment in segments {
        match segment {
            Segment::Single(n) => accessions.push(accession(prefix, n)),
            Segment::Span(start, end) => {
                accessions.extend((start..=end).map(|n| accession(prefix, n)));
            }
        }
    }
    Ok(accessions)
}

/// Number of identifiers an expression expands to
pub fn count_range(expr: &str) -> Result<u64, RangeError> {
    Ok(parse_segments(expr)?
        .iter()
        .map(|s| match *s {
            Segment::Single(_) => 1,
            Segment::Span(start, end) => u64::from(end - start) + 1,
        })
        .sum())
}

/// Build one accession from a prefix and sequence number
pub fn accession(prefix: &str, sequence: u32) -> String {
    format!("{}{}", prefix, zero_pad(sequence, SEQUENCE_WIDTH))
}

fn parse_segments(expr: &str) -> Result<Vec<Segment>, RangeError> {
    if expr.trim().is_empty() {
        return Err(RangeError::Empty);
    }

    expr.split(',')
        .enumerate()
        .map(|(i, raw)| parse_segment(raw.trim(), i + 1))
        .collect()
}

fn parse_segment(segment: &str, position: usize) -> Result<Segment, RangeError> {
    let invalid = || RangeError::InvalidSegment {
        segment: segment.to_string(),
        position,
    };

    match segment.split_once('-') {
        None => parse_positive(segment).map(Segment::Single).ok_or_else(invalid),
        Some((start, end)) => {
            let start = parse_positive(start.trim()).ok_or_else(invalid)?;
            let end = parse_positive(end.trim()).ok_or_else(invalid)?;
            if start > end {
                return Err(RangeError::Descending {
                    segment: segment.to_string(),
                    position,
                    start,
                    end,
                });
            }
            Ok(Segment::Span(start, end))
        }
    }
}

/// Digits only, no sign, greater than zero, fits in u32
fn parse_positive(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_for_2025_date() {
        assert_eq!(generate_prefix(Some("2025-05-19")), "CN25-");
        assert_eq!(generate_prefix(Some("2009-01-01")), "CN09-");
        assert_eq!(generate_prefix(Some("2100-12-31")), "CN00-");
    }

    #[test]
    fn test_prefix_falls_back_to_today() {
        let expected = prefix_for_date(dates::today_date());
        assert_eq!(generate_prefix(None), expected);
        assert_eq!(generate_prefix(Some("")), expected);
        assert_eq!(generate_prefix(Some("garbage")), expected);
        assert_eq!(generate_prefix(Some("2025-13-45")), expected);
    }

    #[test]
    fn test_validate_accepts_grammar() {
        assert!(validate_range("001-005"));
        assert!(validate_range("1,3,5-7"));
        assert!(validate_range("42"));
        assert!(validate_range(" 1 , 2 - 4 "));
        assert!(validate_range("5-5"));
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(!validate_range("5-1"));
        assert!(!validate_range("abc"));
        assert!(!validate_range(""));
        assert!(!validate_range("   "));
        assert!(!validate_range("1,,2"));
        assert!(!validate_range("1,"));
        assert!(!validate_range("0"));
        assert!(!validate_range("0-3"));
        assert!(!validate_range("-3"));
        assert!(!validate_range("+3"));
        assert!(!validate_range("1-2-3"));
        assert!(!validate_range("1.5"));
        assert!(!validate_range("99999999999"));
        // One bad token poisons the whole expression
        assert!(!validate_range("1,2,x,4"));
    }

    #[test]
    fn test_parse_simple_range() {
        assert_eq!(
            parse_range("1-3", "CN25-").unwrap(),
            vec!["CN25-001", "CN25-002", "CN25-003"]
        );
    }

    #[test]
    fn test_parse_mixed_segments_keep_order() {
        assert_eq!(
            parse_range("1,3,5-6", "CN25-").unwrap(),
            vec!["CN25-001", "CN25-003", "CN25-005", "CN25-006"]
        );
        assert_eq!(
            parse_range("9,2-3", "CN25-").unwrap(),
            vec!["CN25-009", "CN25-002", "CN25-003"]
        );
    }

    #[test]
    fn test_parse_pads_without_truncating() {
        assert_eq!(
            parse_range("999-1001", "CN25-").unwrap(),
            vec!["CN25-999", "CN25-1000", "CN25-1001"]
        );
        assert_eq!(zero_pad(7, 3), "007");
        assert_eq!(zero_pad(12345, 3), "12345");
    }

    #[test]
    fn test_parse_reports_first_bad_segment() {
        assert_eq!(
            parse_range("1,abc,5-1", "CN25-"),
            Err(RangeError::InvalidSegment {
                segment: "abc".to_string(),
                position: 2
            })
        );
        assert_eq!(
            parse_range("1, 5-1", "CN25-"),
            Err(RangeError::Descending {
                segment: "5-1".to_string(),
                position: 2,
                start: 5,
                end: 1
            })
        );
        assert_eq!(parse_range("  ", "CN25-"), Err(RangeError::Empty));
    }

    #[test]
    fn test_validate_and_parse_agree() {
        for expr in ["1", "1-3", "3-1", "a", "", "1,2", "1,,2", "10 - 12", "0"] {
            assert_eq!(validate_range(expr), parse_range(expr, "CN25-").is_ok(), "{}", expr);
        }
    }

    #[test]
    fn test_count_range() {
        assert_eq!(count_range("1,3,5-7").unwrap(), 5);
        assert!(count_range("5-1").is_err());
    }
}
