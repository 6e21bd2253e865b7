//! Project discovery and initialization
//!
//! A project is any directory containing a `.lqc/` folder. Commands run from
//! anywhere inside it.

use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::config::{PROJECT_CONFIG_FILE, PROJECT_CONFIG_TEMPLATE};
use crate::core::record::Record;
use crate::entities::{CaseRecord, StainQcEntry};

/// Marker directory at the project root
pub const PROJECT_MARKER: &str = ".lqc";

#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("not inside an LQC project (searched upward from {0})")]
    #[diagnostic(code(lqc::project::not_found), help("run `lqc init` to create one"))]
    NotFound(PathBuf),

    #[error("an LQC project already exists at {0}")]
    #[diagnostic(code(lqc::project::exists))]
    AlreadyExists(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A discovered project root
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find the project enclosing the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir().map_err(|source| ProjectError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::discover_from(&cwd)
    }

    /// Find the project enclosing `start`
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_MARKER).is_dir())
            .map(|dir| Self {
                root: dir.to_path_buf(),
            })
            .ok_or_else(|| ProjectError::NotFound(start.to_path_buf()))
    }

    /// Create a project at `root`
    pub fn init(root: &Path) -> Result<Self, ProjectError> {
        if root.join(PROJECT_MARKER).is_dir() {
            return Err(ProjectError::AlreadyExists(root.to_path_buf()));
        }

        for dir in [PROJECT_MARKER, CaseRecord::DIR, StainQcEntry::DIR] {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(|source| ProjectError::Io { path, source })?;
        }
        let config = root.join(PROJECT_CONFIG_FILE);
        fs::write(&config, PROJECT_CONFIG_TEMPLATE)
            .map_err(|source| ProjectError::Io { path: config, source })?;

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
