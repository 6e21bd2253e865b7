//! Stain QC entity type - Daily quality checks of special and routine stains

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::identity::{RecordId, RecordPrefix};
use crate::core::record::Record;

/// Outcome of a stain quality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QcRating {
    Acceptable,
    Unacceptable,
}

impl std::fmt::Display for QcRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QcRating::Acceptable => write!(f, "acceptable"),
            QcRating::Unacceptable => write!(f, "unacceptable"),
        }
    }
}

/// A Stain QC log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StainQcEntry {
    /// Unique identifier
    pub id: RecordId,

    /// Date the QC check was done (YYYY-MM-DD)
    pub date: String,

    /// Stain name (e.g., "PAP", "GMS")
    pub stain: String,

    /// QC outcome
    pub rating: QcRating,

    /// Initials of the technician who ran the check
    pub technician: String,

    /// Free-text remarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author
    pub author: String,
}

impl Record for StainQcEntry {
    const PREFIX: RecordPrefix = RecordPrefix::Stqc;
    const DIR: &'static str = "stains";
    const NAME: &'static str = "stain QC entry";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl StainQcEntry {
    pub fn new(
        date: impl Into<String>,
        stain: impl Into<String>,
        rating: QcRating,
        technician: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(RecordPrefix::Stqc),
            date: date.into(),
            stain: stain.into(),
            rating,
            technician: technician.into(),
            notes: None,
            created: Utc::now(),
            author: author.into(),
        }
    }
}

/// Which stains a QC entry applies to
///
/// Single-select and multi-select are two modes of one selection, so there is
/// never a second copy to keep in sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StainSelection {
    Single(Option<String>),
    Multiple(BTreeSet<String>),
}

impl Default for StainSelection {
    fn default() -> Self {
        StainSelection::Single(None)
    }
}

impl StainSelection {
    /// Build a selection from a list of names; one name is a single selection
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.len() <= 1 {
            StainSelection::Single(set.into_iter().next())
        } else {
            StainSelection::Multiple(set)
        }
    }

    /// Select a stain: replaces in single mode, adds in multiple mode
    pub fn select(&mut self, name: impl Into<String>) {
        match self {
            StainSelection::Single(current) => *current = Some(name.into()),
            StainSelection::Multiple(set) => {
                set.insert(name.into());
            }
        }
    }

    /// Toggle a stain: clears or sets in single mode, flips membership in multiple mode
    pub fn toggle(&mut self, name: &str) {
        match self {
            StainSelection::Single(current) => {
                if current.as_deref() == Some(name) {
                    *current = None;
                } else {
                    *current = Some(name.to_string());
                }
            }
            StainSelection::Multiple(set) => {
                if !set.remove(name) {
                    set.insert(name.to_string());
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            StainSelection::Single(current) => current.as_deref() == Some(name),
            StainSelection::Multiple(set) => set.contains(name),
        }
    }

    /// Selected names in order
    pub fn names(&self) -> Vec<&str> {
        match self {
            StainSelection::Single(current) => current.as_deref().into_iter().collect(),
            StainSelection::Multiple(set) => set.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            StainSelection::Single(current) => current.is_none(),
            StainSelection::Multiple(set) => set.is_empty(),
        }
    }

    /// Switch to single mode, keeping the first selected name
    pub fn into_single(self) -> Self {
        match self {
            StainSelection::Multiple(set) => StainSelection::Single(set.into_iter().next()),
            single => single,
        }
    }

    /// Switch to multiple mode, keeping the current name
    pub fn into_multiple(self) -> Self {
        match self {
            StainSelection::Single(current) => {
                StainSelection::Multiple(current.into_iter().collect())
            }
            multiple => multiple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = StainQcEntry::new("2025-05-19", "PAP", QcRating::Acceptable, "AB", "test");
        assert!(entry.id.to_string().starts_with("STQC-"));
        assert_eq!(entry.rating.to_string(), "acceptable");
    }

    #[test]
    fn test_from_names_picks_mode() {
        assert_eq!(
            StainSelection::from_names(["PAP"]),
            StainSelection::Single(Some("PAP".to_string()))
        );
        assert!(matches!(
            StainSelection::from_names(["PAP", "GMS"]),
            StainSelection::Multiple(_)
        ));
        assert!(StainSelection::from_names(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_single_mode_replaces() {
        let mut sel = StainSelection::default();
        sel.select("PAP");
        sel.select("GMS");
        assert_eq!(sel.names(), vec!["GMS"]);
        sel.toggle("GMS");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_multiple_mode_accumulates() {
        let mut sel = StainSelection::Multiple(BTreeSet::new());
        sel.select("PAP");
        sel.select("GMS");
        sel.toggle("PAP");
        sel.toggle("AFB");
        assert_eq!(sel.names(), vec!["AFB", "GMS"]);
        assert!(sel.contains("GMS"));
        assert!(!sel.contains("PAP"));
    }

    #[test]
    fn test_mode_switch_preserves_selection() {
        let sel = StainSelection::Single(Some("PAP".to_string())).into_multiple();
        assert_eq!(sel.names(), vec!["PAP"]);

        let sel = StainSelection::from_names(["PAP", "GMS"]).into_single();
        assert_eq!(sel, StainSelection::Single(Some("GMS".to_string())));

        let sel = StainSelection::Multiple(BTreeSet::new()).into_single();
        assert_eq!(sel, StainSelection::Single(None));
    }
}
