//! Sorting for list and summary views
//!
//! Values are compared by kind: text case-insensitively, dates
//! chronologically, numbers numerically. Missing values always go last,
//! whichever direction is requested.

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::core::dates;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// A comparable value pulled out of a row
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Date(NaiveDate),
    Number(f64),
}

impl SortValue {
    /// Text value; blank strings count as missing
    pub fn text(s: Option<&str>) -> Option<SortValue> {
        s.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| SortValue::Text(s.to_string()))
    }

    /// Date value; anything that is not a real calendar date counts as missing
    pub fn date(s: Option<&str>) -> Option<SortValue> {
        s.and_then(dates::parse_calendar_date).map(SortValue::Date)
    }

    pub fn number(n: impl Into<f64>) -> Option<SortValue> {
        Some(SortValue::Number(n.into()))
    }

    fn cmp_present(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            // Mixed kinds only happen with a buggy key extractor; keep it stable
            _ => Ordering::Equal,
        }
    }
}

/// Compare two optional values, missing last regardless of direction
pub fn compare(a: &Option<SortValue>, b: &Option<SortValue>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp_present(b),
            SortDirection::Descending => b.cmp_present(a),
        },
    }
}

/// Stable sort of rows by an extracted key
pub fn sort_rows<T, F>(rows: &mut [T], direction: SortDirection, key: F)
where
    F: Fn(&T) -> Option<SortValue>,
{
    rows.sort_by(|a, b| compare(&key(a), &key(b), direction));
}
