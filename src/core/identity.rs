//! Record identity - prefixed ULIDs
//!
//! Every stored record gets an id like `CASE-01J9ZK3V8Q8M2X1Y4N6P7R5T0W`.
//! The prefix names the record type, the ULID keeps ids sortable by creation
//! time and unique without a central counter.

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Record type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordPrefix {
    /// Non-gynecological case record
    Case,
    /// Stain QC log entry
    Stqc,
}

impl RecordPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Case => "CASE",
            RecordPrefix::Stqc => "STQC",
        }
    }

    pub fn all() -> &'static [RecordPrefix] {
        &[RecordPrefix::Case, RecordPrefix::Stqc]
    }
}

impl fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CASE" => Ok(RecordPrefix::Case),
            "STQC" => Ok(RecordPrefix::Stqc),
            _ => Err(IdParseError::UnknownPrefix(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IdParseError {
    #[error("missing '-' separator in record id '{0}'")]
    MissingSeparator(String),

    #[error("unknown record prefix '{0}'")]
    UnknownPrefix(String),

    #[error("invalid ULID in record id '{0}'")]
    InvalidUlid(String),
}

/// A prefixed, globally unique record id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    prefix: RecordPrefix,
    ulid: Ulid,
}

impl RecordId {
    /// Generate a fresh id
    pub fn new(prefix: RecordPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> RecordPrefix {
        self.prefix
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }

    /// Parse `PREFIX-ULID`
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let (prefix, ulid) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let prefix: RecordPrefix = prefix.parse()?;
        let ulid = Ulid::from_string(ulid).map_err(|_| IdParseError::InvalidUlid(s.to_string()))?;
        Ok(Self { prefix, ulid })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for RecordId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Fresh group id shared by records created from one range submission
pub fn new_range_group() -> String {
    Ulid::new().to_string()
}
