//! Record store - one YAML file per record
//!
//! Records live under `<root>/<Record::DIR>/<id>.lqc.yaml`. The store owns
//! uniqueness of each record type's business key (the accession for cases);
//! nothing upstream of it checks for duplicates.

use miette::Diagnostic;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::identity::RecordId;
use crate::core::record::Record;
use crate::yaml::{parse_yaml_file, YamlError};

/// Suffix of every record file
pub const RECORD_SUFFIX: &str = ".lqc.yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("{kind} '{key}' already exists")]
    #[diagnostic(
        code(lqc::store::duplicate),
        help("delete the existing record first or pick another number")
    )]
    Duplicate { kind: &'static str, key: String },

    #[error("{kind} '{id}' not found")]
    #[diagnostic(code(lqc::store::not_found))]
    NotFound { kind: &'static str, id: String },

    #[error("failed to serialize {id}: {source}")]
    Serialize {
        id: String,
        #[source]
        source: serde_yml::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// File-backed record store rooted at a project directory
#[derive(Debug, Clone)]
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    /// Open a store rooted at `root`; record directories are created lazily
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding records of type `T`
    pub fn dir_for<T: Record>(&self) -> PathBuf {
        self.root.join(T::DIR)
    }

    /// File path for a record id
    pub fn path_for<T: Record>(&self, id: &RecordId) -> PathBuf {
        self.dir_for::<T>().join(format!("{}{}", id, RECORD_SUFFIX))
    }

    /// Insert a new record, rejecting a duplicate business key
    pub fn insert<T: Record>(&self, record: &T) -> Result<PathBuf, StoreError> {
        if let Some(key) = record.unique_key() {
            if self.find_by_unique_key::<T>(key)?.is_some() {
                return Err(StoreError::Duplicate {
                    kind: T::NAME,
                    key: key.to_string(),
                });
            }
        }
        let path = self.write(record)?;
        info!(id = %record.id(), kind = T::NAME, "Record created");
        Ok(path)
    }

    /// Insert a batch: all records are written or none are
    pub fn insert_all<T: Record>(&self, records: &[T]) -> Result<Vec<PathBuf>, StoreError> {
        let existing: HashSet<String> = self
            .load_all::<T>()?
            .iter()
            .filter_map(|r| r.unique_key().map(str::to_string))
            .collect();

        let mut seen = HashSet::new();
        for record in records {
            if let Some(key) = record.unique_key() {
                if existing.contains(key) || !seen.insert(key) {
                    return Err(StoreError::Duplicate {
                        kind: T::NAME,
                        key: key.to_string(),
                    });
                }
            }
        }

        let mut written = Vec::with_capacity(records.len());
        for record in records {
            match self.write(record) {
                Ok(path) => written.push(path),
                Err(e) => {
                    warn!(
                        error = %e,
                        rolled_back = written.len(),
                        "Batch insert failed, rolling back"
                    );
                    for path in &written {
                        let _ = fs::remove_file(path);
                    }
                    return Err(e);
                }
            }
        }
        info!(count = written.len(), kind = T::NAME, "Records created");
        Ok(written)
    }

    /// Load one record by id
    pub fn get<T: Record>(&self, id: &RecordId) -> Result<T, StoreError> {
        let path = self.path_for::<T>(id);
        if !path.exists() {
            return Err(StoreError::NotFound {
                kind: T::NAME,
                id: id.to_string(),
            });
        }
        Ok(parse_yaml_file(&path)?)
    }

    /// Overwrite an existing record
    pub fn update<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        if !self.path_for::<T>(record.id()).exists() {
            return Err(StoreError::NotFound {
                kind: T::NAME,
                id: record.id().to_string(),
            });
        }
        if let Some(key) = record.unique_key() {
            if let Some(other) = self.find_by_unique_key::<T>(key)? {
                if other.id() != record.id() {
                    return Err(StoreError::Duplicate {
                        kind: T::NAME,
                        key: key.to_string(),
                    });
                }
            }
        }
        self.write(record)?;
        info!(id = %record.id(), kind = T::NAME, "Record updated");
        Ok(())
    }

    /// Remove a record
    pub fn delete<T: Record>(&self, id: &RecordId) -> Result<(), StoreError> {
        let path = self.path_for::<T>(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(id = %id, kind = T::NAME, "Record deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                kind: T::NAME,
                id: id.to_string(),
            }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Load every record of type `T`
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_all<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let dir = self.dir_for::<T>();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&dir).max_depth(1).into_iter() {
            let entry = entry.map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !path.to_string_lossy().ends_with(RECORD_SUFFIX) {
                continue;
            }
            match parse_yaml_file::<T>(path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
            }
        }
        debug!(count = records.len(), kind = T::NAME, "Loaded records");
        Ok(records)
    }

    /// Records matching `filter`, optionally ordered by `order`
    pub fn select<T, F, O>(&self, filter: F, order: Option<O>) -> Result<Vec<T>, StoreError>
    where
        T: Record,
        F: Fn(&T) -> bool,
        O: Fn(&T, &T) -> Ordering,
    {
        let mut records: Vec<T> = self
            .load_all::<T>()?
            .into_iter()
            .filter(|r| filter(r))
            .collect();
        match order {
            Some(order) => records.sort_by(|a, b| order(a, b)),
            None => records.sort_by(|a, b| a.id().cmp(b.id())),
        }
        Ok(records)
    }

    /// Records matching `filter` in id (creation) order
    pub fn select_where<T, F>(&self, filter: F) -> Result<Vec<T>, StoreError>
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        self.select(filter, None::<fn(&T, &T) -> Ordering>)
    }

    /// Find the record holding a business key
    pub fn find_by_unique_key<T: Record>(&self, key: &str) -> Result<Option<T>, StoreError> {
        Ok(self
            .load_all::<T>()?
            .into_iter()
            .find(|r| r.unique_key() == Some(key)))
    }

    fn write<T: Record>(&self, record: &T) -> Result<PathBuf, StoreError> {
        let dir = self.dir_for::<T>();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = self.path_for::<T>(record.id());
        let yaml = serde_yml::to_string(record).map_err(|source| StoreError::Serialize {
            id: record.id().to_string(),
            source,
        })?;
        fs::write(&path, yaml).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Wrote record");
        Ok(path)
    }
}
