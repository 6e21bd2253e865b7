//! Case entity type - Non-gynecological cases tracked from preparation to screening

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::record::Record;
use crate::core::sorting::{sort_rows, SortDirection, SortValue};

/// Lifecycle state derived from which fields are filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Prepared, waiting for screening
    Pending,
    /// Screened: date screened, pathologist and time recorded
    Completed,
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Pending => write!(f, "pending"),
            CaseStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A Case record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Unique identifier
    pub id: RecordId,

    /// Accession identifier (e.g., CN25-014)
    pub accession: String,

    /// Date the slides were prepared (YYYY-MM-DD)
    pub date_prepared: String,

    /// Date screening finished (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_screened: Option<String>,

    /// Initials of the preparing technician
    pub technician: String,

    /// Initials of the screening pathologist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathologist: Option<String>,

    /// Conventional slide count
    #[serde(default)]
    pub standard_slides: u32,

    /// Liquid-based slide count
    #[serde(default)]
    pub lb_slides: u32,

    /// Screening time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<u32>,

    /// Shared by all cases created from one range submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_group: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who entered this case)
    pub author: String,
}

impl Record for CaseRecord {
    const PREFIX: RecordPrefix = RecordPrefix::Case;
    const DIR: &'static str = "cases";
    const NAME: &'static str = "case";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.accession)
    }
}

impl CaseRecord {
    /// Create a new pending case
    pub fn new(
        accession: impl Into<String>,
        date_prepared: impl Into<String>,
        technician: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Case),
            accession: accession.into(),
            date_prepared: date_prepared.into(),
            date_screened: None,
            technician: technician.into(),
            pathologist: None,
            standard_slides: 0,
            lb_slides: 0,
            time_minutes: None,
            range_group: None,
            created: Utc::now(),
            author: author.into(),
        }
    }

    /// Derived lifecycle state
    pub fn status(&self) -> CaseStatus {
        if self.date_screened.is_some() && self.pathologist.is_some() && self.time_minutes.is_some()
        {
            CaseStatus::Completed
        } else {
            CaseStatus::Pending
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == CaseStatus::Completed
    }

    /// Apply a partial update
    ///
    /// The three completion fields must end up either all set or all unset;
    /// otherwise the record is left untouched.
    pub fn apply(&mut self, update: &CaseUpdate) -> Result<(), CaseUpdateError> {
        let mut next = self.clone();
        if let Some(ref v) = update.date_prepared {
            next.date_prepared = v.clone();
        }
        if let Some(ref v) = update.technician {
            next.technician = v.clone();
        }
        if let Some(v) = update.standard_slides {
            next.standard_slides = v;
        }
        if let Some(v) = update.lb_slides {
            next.lb_slides = v;
        }
        if update.date_screened.is_some() {
            next.date_screened = update.date_screened.clone();
        }
        if update.pathologist.is_some() {
            next.pathologist = update.pathologist.clone();
        }
        if update.time_minutes.is_some() {
            next.time_minutes = update.time_minutes;
        }

        let filled = [
            next.date_screened.is_some(),
            next.pathologist.is_some(),
            next.time_minutes.is_some(),
        ];
        if filled.iter().any(|f| *f) && !filled.iter().all(|f| *f) {
            return Err(CaseUpdateError::PartialCompletion {
                accession: self.accession.clone(),
            });
        }

        *self = next;
        Ok(())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum CaseUpdateError {
    #[error("case {accession}: date screened, pathologist and time must be recorded together")]
    #[diagnostic(
        code(lqc::case::partial_completion),
        help("pass --screened, --pathologist and --minutes in the same command")
    )]
    PartialCompletion { accession: String },
}

/// Field-by-field partial update of a case
///
/// Unset fields leave the record's value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_prepared: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_screened: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathologist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_slides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lb_slides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_minutes: Option<u32>,
}

impl CaseUpdate {
    /// Update that completes screening
    pub fn completion(
        date_screened: impl Into<String>,
        pathologist: impl Into<String>,
        time_minutes: u32,
    ) -> Self {
        Self {
            date_screened: Some(date_screened.into()),
            pathologist: Some(pathologist.into()),
            time_minutes: Some(time_minutes),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == CaseUpdate::default()
    }

    /// Combine with a later update; fields set in `later` win
    pub fn merge(self, later: CaseUpdate) -> CaseUpdate {
        CaseUpdate {
            date_prepared: later.date_prepared.or(self.date_prepared),
            date_screened: later.date_screened.or(self.date_screened),
            technician: later.technician.or(self.technician),
            pathologist: later.pathologist.or(self.pathologist),
            standard_slides: later.standard_slides.or(self.standard_slides),
            lb_slides: later.lb_slides.or(self.lb_slides),
            time_minutes: later.time_minutes.or(self.time_minutes),
        }
    }
}

/// Updates staged per record before they are written
#[derive(Debug, Default)]
pub struct PendingUpdates {
    updates: BTreeMap<RecordId, CaseUpdate>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an update, merging into anything already staged for the record
    pub fn stage(&mut self, id: RecordId, update: CaseUpdate) {
        let merged = match self.updates.remove(&id) {
            Some(existing) => existing.merge(update),
            None => update,
        };
        if !merged.is_empty() {
            self.updates.insert(id, merged);
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<&CaseUpdate> {
        self.updates.get(id)
    }

    /// Drop whatever is staged for a record
    pub fn discard(&mut self, id: &RecordId) -> Option<CaseUpdate> {
        self.updates.remove(id)
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Take every staged update in id order, leaving the set empty
    pub fn drain(&mut self) -> Vec<(RecordId, CaseUpdate)> {
        std::mem::take(&mut self.updates).into_iter().collect()
    }
}

/// Keys a case list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSortKey {
    Accession,
    DatePrepared,
    DateScreened,
    Technician,
    Pathologist,
    Slides,
    Time,
    Status,
}

/// Sort cases by a key; missing values go last in either direction
pub fn sort_cases(rows: &mut [CaseRecord], key: CaseSortKey, direction: SortDirection) {
    sort_rows(rows, direction, |c| match key {
        CaseSortKey::Accession => SortValue::text(Some(c.accession.as_str())),
        CaseSortKey::DatePrepared => SortValue::date(Some(c.date_prepared.as_str())),
        CaseSortKey::DateScreened => SortValue::date(c.date_screened.as_deref()),
        CaseSortKey::Technician => SortValue::text(Some(c.technician.as_str())),
        CaseSortKey::Pathologist => SortValue::text(c.pathologist.as_deref()),
        CaseSortKey::Slides => SortValue::number(c.standard_slides + c.lb_slides),
        CaseSortKey::Time => c.time_minutes.and_then(SortValue::number),
        CaseSortKey::Status => SortValue::text(Some(c.status().to_string().as_str())),
    });
}
