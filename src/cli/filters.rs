//! Shared filter and sort enums for CLI commands

use clap::ValueEnum;

use crate::core::dates::{self, DateError};
use crate::core::workload::SummarySortKey;
use crate::entities::case::{CaseSortKey, CaseStatus};
use crate::entities::stain::QcRating;

/// Status filter for case lists
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum CaseStatusFilter {
    /// Waiting for screening
    Pending,
    /// Screened
    Completed,
    /// Everything - default
    #[default]
    All,
}

impl CaseStatusFilter {
    pub fn matches(&self, status: &CaseStatus) -> bool {
        match self {
            CaseStatusFilter::Pending => *status == CaseStatus::Pending,
            CaseStatusFilter::Completed => *status == CaseStatus::Completed,
            CaseStatusFilter::All => true,
        }
    }
}

impl std::fmt::Display for CaseStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatusFilter::Pending => write!(f, "pending"),
            CaseStatusFilter::Completed => write!(f, "completed"),
            CaseStatusFilter::All => write!(f, "all"),
        }
    }
}

/// Inclusive calendar-date window; open ends match everything
///
/// Both bounds are `YYYY-MM-DD`, so plain string comparison is enough.
#[derive(Debug, Clone, Default)]
pub struct DateWindow {
    pub since: Option<String>,
    pub until: Option<String>,
}

impl DateWindow {
    pub fn new(since: Option<String>, until: Option<String>) -> Self {
        Self { since, until }
    }

    /// Build from `--since`/`--until` flags, rejecting anything but real calendar dates
    pub fn from_args(since: Option<String>, until: Option<String>) -> Result<Self, DateError> {
        for (label, value) in [("--since", &since), ("--until", &until)] {
            if let Some(v) = value {
                if dates::parse_calendar_date(v).is_none() {
                    return Err(DateError::NotCanonical {
                        label: label.to_string(),
                        value: v.clone(),
                    });
                }
            }
        }
        Ok(Self::new(since, until))
    }

    /// Whether a date falls inside the window; a missing date only matches an open window
    pub fn contains(&self, date: Option<&str>) -> bool {
        if self.since.is_none() && self.until.is_none() {
            return true;
        }
        let Some(date) = date.filter(|d| dates::is_calendar_date(d)) else {
            return false;
        };
        self.since.as_deref().is_none_or(|s| date >= s)
            && self.until.as_deref().is_none_or(|u| date <= u)
    }
}

/// Case list sort column
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum CaseSortColumn {
    #[default]
    Accession,
    Prepared,
    Screened,
    Tech,
    Pathologist,
    Slides,
    Time,
    Status,
}

impl From<CaseSortColumn> for CaseSortKey {
    fn from(col: CaseSortColumn) -> Self {
        match col {
            CaseSortColumn::Accession => CaseSortKey::Accession,
            CaseSortColumn::Prepared => CaseSortKey::DatePrepared,
            CaseSortColumn::Screened => CaseSortKey::DateScreened,
            CaseSortColumn::Tech => CaseSortKey::Technician,
            CaseSortColumn::Pathologist => CaseSortKey::Pathologist,
            CaseSortColumn::Slides => CaseSortKey::Slides,
            CaseSortColumn::Time => CaseSortKey::Time,
            CaseSortColumn::Status => CaseSortKey::Status,
        }
    }
}

/// Workload summary sort column
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum SummarySortColumn {
    Pathologist,
    #[default]
    Screened,
    Prepared,
    Slides,
    Time,
    Cases,
    Limit,
}

impl From<SummarySortColumn> for SummarySortKey {
    fn from(col: SummarySortColumn) -> Self {
        match col {
            SummarySortColumn::Pathologist => SummarySortKey::Pathologist,
            SummarySortColumn::Screened => SummarySortKey::DateScreened,
            SummarySortColumn::Prepared => SummarySortKey::DatePrepared,
            SummarySortColumn::Slides => SummarySortKey::Slides,
            SummarySortColumn::Time => SummarySortKey::Time,
            SummarySortColumn::Cases => SummarySortKey::Cases,
            SummarySortColumn::Limit => SummarySortKey::Limit,
        }
    }
}

/// Stain QC rating as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CliRating {
    Acceptable,
    Unacceptable,
}

impl From<CliRating> for QcRating {
    fn from(r: CliRating) -> Self {
        match r {
            CliRating::Acceptable => QcRating::Acceptable,
            CliRating::Unacceptable => QcRating::Unacceptable,
        }
    }
}
