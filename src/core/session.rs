//! Per-command session state
//!
//! A `Session` owns everything a command needs to talk to the record store:
//! the project root, the merged configuration and the store handle. It is
//! built once at the start of a command and passed down explicitly.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::core::config::{Config, ConfigError};
use crate::core::project::{Project, ProjectError};
use crate::core::store::YamlStore;

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug)]
pub struct Session {
    project: Project,
    config: Config,
    store: YamlStore,
    opened_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for the project enclosing the current directory
    pub fn open() -> Result<Self, SessionError> {
        let project = Project::discover()?;
        Self::for_project(project)
    }

    /// Open a session for a known project
    pub fn for_project(project: Project) -> Result<Self, SessionError> {
        let config = Config::load(Some(project.root()))?;
        let store = YamlStore::open(project.root());
        let opened_at = Utc::now();
        debug!(root = %project.root().display(), %opened_at, "Session opened");
        Ok(Self {
            project,
            config,
            store,
            opened_at,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &YamlStore {
        &self.store
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Name recorded as `author` on new records
    pub fn author(&self) -> String {
        self.config.author()
    }

    /// Export directory: configured value resolved against the project root
    pub fn export_dir(&self) -> PathBuf {
        match &self.config.export_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.project.root().join(dir),
            None => self.project.root().join("exports"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_session_for_new_project() {
        let tmp = TempDir::new().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        let session = Session::for_project(project).unwrap();

        assert_eq!(session.store().root(), tmp.path());
        assert!(session.opened_at() <= Utc::now());
    }

    #[test]
    fn test_export_dir_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(tmp.path().join(".lqc/config.yaml"), "export_dir: out/csv\n").unwrap();
        let session = Session::for_project(project).unwrap();

        // LQC_EXPORT_DIR in the environment would override the file
        if std::env::var("LQC_EXPORT_DIR").is_err() {
            assert_eq!(session.export_dir(), tmp.path().join("out/csv"));
        }
    }
}
