//! Record type definitions

pub mod case;
pub mod stain;

pub use case::{sort_cases, CaseRecord, CaseSortKey, CaseStatus, CaseUpdate, PendingUpdates};
pub use stain::{QcRating, StainQcEntry, StainSelection};
