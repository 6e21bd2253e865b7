//! Record trait - common interface for all stored record types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{RecordId, RecordPrefix};

/// Common trait for all LQC records
pub trait Record: Serialize + DeserializeOwned {
    /// The id prefix for this record type
    const PREFIX: RecordPrefix;

    /// Directory under the project root where records of this type live
    const DIR: &'static str;

    /// Singular name for messages (e.g., "case")
    const NAME: &'static str;

    /// Get the record's unique id
    fn id(&self) -> &RecordId;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// Get the author
    fn author(&self) -> &str;

    /// Business key the store keeps unique across records of this type
    fn unique_key(&self) -> Option<&str> {
        None
    }
}
