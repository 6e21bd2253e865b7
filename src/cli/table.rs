//! Table rendering for list output

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::truncate_str;
use crate::core::dates::format_for_display;
use crate::core::workload::WorkloadSummary;
use crate::entities::case::CaseRecord;
use crate::entities::stain::StainQcEntry;

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "ACCESSION")]
    accession: String,
    #[tabled(rename = "PREPARED")]
    prepared: String,
    #[tabled(rename = "TECH")]
    tech: String,
    #[tabled(rename = "STD")]
    standard: u32,
    #[tabled(rename = "LB")]
    lb: u32,
    #[tabled(rename = "SCREENED")]
    screened: String,
    #[tabled(rename = "PATH")]
    pathologist: String,
    #[tabled(rename = "MIN")]
    minutes: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<&CaseRecord> for CaseRow {
    fn from(case: &CaseRecord) -> Self {
        Self {
            accession: case.accession.clone(),
            prepared: format_for_display(Some(case.date_prepared.as_str())),
            tech: case.technician.clone(),
            standard: case.standard_slides,
            lb: case.lb_slides,
            screened: format_for_display(case.date_screened.as_deref()),
            pathologist: case
                .pathologist
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            minutes: case
                .time_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: case.status().to_string(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "PATHOLOGIST")]
    pathologist: String,
    #[tabled(rename = "SCREENED")]
    screened: String,
    #[tabled(rename = "PREPARED")]
    prepared: String,
    #[tabled(rename = "CASES")]
    cases: u32,
    #[tabled(rename = "SLIDES")]
    slides: String,
    #[tabled(rename = "MINUTES")]
    minutes: u32,
    #[tabled(rename = "LIMIT")]
    limit: String,
}

impl From<&WorkloadSummary> for SummaryRow {
    fn from(s: &WorkloadSummary) -> Self {
        Self {
            pathologist: s.pathologist.clone(),
            screened: format_for_display(Some(s.date_screened.as_str())),
            prepared: s.date_prepared.clone(),
            cases: s.case_count,
            slides: format!("{:.1}", s.slide_total),
            minutes: s.time_minutes,
            limit: s.limit.to_string(),
        }
    }
}

#[derive(Tabled)]
struct StainRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STAIN")]
    stain: String,
    #[tabled(rename = "RATING")]
    rating: String,
    #[tabled(rename = "TECH")]
    tech: String,
    #[tabled(rename = "NOTES")]
    notes: String,
}

impl From<&StainQcEntry> for StainRow {
    fn from(e: &StainQcEntry) -> Self {
        Self {
            date: format_for_display(Some(e.date.as_str())),
            stain: e.stain.clone(),
            rating: e.rating.to_string(),
            tech: e.technician.clone(),
            notes: truncate_str(e.notes.as_deref().unwrap_or(""), 40),
        }
    }
}

pub fn case_table(cases: &[CaseRecord]) -> String {
    let mut table = Table::new(cases.iter().map(CaseRow::from));
    table.with(Style::sharp());
    table.to_string()
}

pub fn summary_table(rows: &[WorkloadSummary]) -> String {
    let mut table = Table::new(rows.iter().map(SummaryRow::from));
    table.with(Style::sharp());
    table.to_string()
}

pub fn stain_table(entries: &[StainQcEntry]) -> String {
    let mut table = Table::new(entries.iter().map(StainRow::from));
    table.with(Style::sharp());
    table.to_string()
}
