//! Workload aggregation
//!
//! Completed cases are rolled up per (pathologist, date screened) into daily
//! summaries. A summary is flagged when the day's slide total or screening
//! time goes over the capacity limits.
//!
//! Slides are counted with a fixed billing unit of one conventional slide at
//! weight 1.0 plus one liquid-based slide at weight 0.5, i.e. 1.5 per case.
//! The record's own slide counts are not used.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::dates;
use crate::core::sorting::{sort_rows, SortDirection, SortValue};
use crate::entities::case::CaseRecord;

/// Weight of a conventional slide
pub const STANDARD_SLIDE_WEIGHT: f64 = 1.0;

/// Weight of a liquid-based slide
pub const LB_SLIDE_WEIGHT: f64 = 0.5;

/// Conventional slides billed per case
pub const STANDARD_SLIDES_PER_CASE: f64 = 1.0;

/// Liquid-based slides billed per case
pub const LB_SLIDES_PER_CASE: f64 = 1.0;

/// Default daily slide limit
pub const DEFAULT_SLIDE_LIMIT: f64 = 100.0;

/// Default daily screening time limit in minutes
pub const DEFAULT_TIME_LIMIT: u32 = 480;

/// Capacity thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadLimits {
    /// Slide total above which a day is flagged
    pub slide_limit: f64,
    /// Minutes above which a day is flagged
    pub time_limit: u32,
}

impl Default for WorkloadLimits {
    fn default() -> Self {
        Self {
            slide_limit: DEFAULT_SLIDE_LIMIT,
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

/// Whether a summary is over capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LimitFlag {
    Yes,
    No,
}

impl LimitFlag {
    pub fn is_over(&self) -> bool {
        *self == LimitFlag::Yes
    }
}

impl std::fmt::Display for LimitFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitFlag::Yes => write!(f, "YES"),
            LimitFlag::No => write!(f, "NO"),
        }
    }
}

/// One pathologist's workload on one screening day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadSummary {
    pub pathologist: String,
    pub date_screened: String,
    pub slide_total: f64,
    pub time_minutes: u32,
    pub case_count: u32,
    /// Earliest date prepared in the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_from: Option<String>,
    /// Latest date prepared in the group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_to: Option<String>,
    /// `M/D/YYYY` or `M/D/YYYY - M/D/YYYY`
    pub date_prepared: String,
    pub limit: LimitFlag,
}

/// Keys a summary list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySortKey {
    Pathologist,
    DateScreened,
    DatePrepared,
    Slides,
    Time,
    Cases,
    Limit,
}

#[derive(Default)]
struct Accumulator {
    slide_total: f64,
    time_minutes: u32,
    case_count: u32,
    prepared_from: Option<String>,
    prepared_to: Option<String>,
}

impl Accumulator {
    fn add(&mut self, case: &CaseRecord) {
        self.slide_total += STANDARD_SLIDES_PER_CASE * STANDARD_SLIDE_WEIGHT
            + LB_SLIDES_PER_CASE * LB_SLIDE_WEIGHT;
        self.time_minutes = self
            .time_minutes
            .saturating_add(case.time_minutes.unwrap_or(0));
        self.case_count += 1;

        let prepared = case.date_prepared.trim();
        if prepared.is_empty() {
            return;
        }
        if self.prepared_from.as_deref().is_none_or(|from| prepared < from) {
            self.prepared_from = Some(prepared.to_string());
        }
        if self.prepared_to.as_deref().is_none_or(|to| prepared > to) {
            self.prepared_to = Some(prepared.to_string());
        }
    }

    fn finish(
        self,
        pathologist: String,
        date_screened: String,
        limits: &WorkloadLimits,
    ) -> WorkloadSummary {
        let over = self.slide_total > limits.slide_limit || self.time_minutes > limits.time_limit;
        let date_prepared = match (&self.prepared_from, &self.prepared_to) {
            (Some(from), Some(to)) if from != to => format!(
                "{} - {}",
                dates::format_for_display(Some(from.as_str())),
                dates::format_for_display(Some(to.as_str()))
            ),
            (from, _) => dates::format_for_display(from.as_deref()),
        };

        WorkloadSummary {
            pathologist,
            date_screened,
            slide_total: self.slide_total,
            time_minutes: self.time_minutes,
            case_count: self.case_count,
            prepared_from: self.prepared_from,
            prepared_to: self.prepared_to,
            date_prepared,
            limit: if over { LimitFlag::Yes } else { LimitFlag::No },
        }
    }
}

/// Summarize completed cases with the default limits
pub fn aggregate(cases: &[CaseRecord]) -> Vec<WorkloadSummary> {
    aggregate_with_limits(cases, &WorkloadLimits::default())
}

/// Summarize completed cases per (pathologist, date screened)
///
/// Cases without a pathologist or a screened date are left out. Output is
/// ordered by pathologist then date; use [`sort_summaries`] for anything else.
pub fn aggregate_with_limits(
    cases: &[CaseRecord],
    limits: &WorkloadLimits,
) -> Vec<WorkloadSummary> {
    let mut groups: BTreeMap<(String, String), Accumulator> = BTreeMap::new();

    for case in cases {
        let (Some(pathologist), Some(screened)) = (
            non_blank(case.pathologist.as_deref()),
            non_blank(case.date_screened.as_deref()),
        ) else {
            continue;
        };

        groups
            .entry((pathologist.to_string(), screened.to_string()))
            .or_default()
            .add(case);
    }

    groups
        .into_iter()
        .map(|((pathologist, screened), acc)| acc.finish(pathologist, screened, limits))
        .collect()
}

/// Sort summaries by a key; missing values go last
pub fn sort_summaries(
    rows: &mut [WorkloadSummary],
    key: SummarySortKey,
    direction: SortDirection,
) {
    sort_rows(rows, direction, |s| match key {
        SummarySortKey::Pathologist => SortValue::text(Some(s.pathologist.as_str())),
        SummarySortKey::DateScreened => SortValue::date(Some(s.date_screened.as_str())),
        SummarySortKey::DatePrepared => SortValue::date(s.prepared_from.as_deref()),
        SummarySortKey::Slides => SortValue::number(s.slide_total),
        SummarySortKey::Time => SortValue::number(s.time_minutes),
        SummarySortKey::Cases => SortValue::number(s.case_count),
        SummarySortKey::Limit => SortValue::text(Some(s.limit.to_string().as_str())),
    });
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
