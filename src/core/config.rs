//! Layered configuration
//!
//! Settings are read from, in increasing precedence:
//! 1. the user config file (`<config dir>/lqc/config.yaml`, or `LQC_CONFIG`)
//! 2. the project file `.lqc/config.yaml`
//! 3. environment variables (`LQC_AUTHOR`, `LQC_EXPORT_DIR`)

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::workload::WorkloadLimits;
use crate::yaml::{parse_yaml, YamlError};

/// Project config file, relative to the project root
pub const PROJECT_CONFIG_FILE: &str = ".lqc/config.yaml";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to load config {path}")]
    #[diagnostic(code(lqc::config::load))]
    Load {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: YamlError,
    },
}

/// Effective configuration after all layers are merged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    /// Operator name recorded on new records
    pub author: Option<String>,
    /// Default directory for CSV exports
    pub export_dir: Option<PathBuf>,
    /// Capacity thresholds for workload flags
    pub workload: WorkloadLimits,
}

/// One config file's worth of settings; everything optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    author: Option<String>,
    export_dir: Option<PathBuf>,
    workload: LimitsLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LimitsLayer {
    slide_limit: Option<f64>,
    time_limit: Option<u32>,
}

impl Config {
    /// Load user, project and environment layers
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = Self::user_config_path() {
            config.apply_file(&path)?;
        }
        if let Some(root) = project_root {
            config.apply_file(&root.join(PROJECT_CONFIG_FILE))?;
        }
        config.apply_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Location of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LQC_CONFIG") {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "lqc").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Operator name: configured author, then the login name
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }
        let load_err = |source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_err(YamlError::Io(e)))?;
        if is_blank_yaml(&content) {
            return Ok(());
        }
        let layer: ConfigLayer =
            parse_yaml(&content, &path.display().to_string()).map_err(load_err)?;
        debug!(path = %path.display(), "Applied config file");
        self.apply_layer(layer);
        Ok(())
    }

    fn apply_layer(&mut self, layer: ConfigLayer) {
        if layer.author.is_some() {
            self.author = layer.author;
        }
        if layer.export_dir.is_some() {
            self.export_dir = layer.export_dir;
        }
        if let Some(limit) = layer.workload.slide_limit {
            self.workload.slide_limit = limit;
        }
        if let Some(limit) = layer.workload.time_limit {
            self.workload.time_limit = limit;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(author) = var("LQC_AUTHOR").filter(|s| !s.trim().is_empty()) {
            self.author = Some(author);
        }
        if let Some(dir) = var("LQC_EXPORT_DIR").filter(|s| !s.trim().is_empty()) {
            self.export_dir = Some(PathBuf::from(dir));
        }
    }
}

/// True when a file holds nothing but comments and whitespace
fn is_blank_yaml(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// Contents written to `.lqc/config.yaml` by `lqc init`
pub const PROJECT_CONFIG_TEMPLATE: &str = "\
# LQC project configuration
#
# author: AB                 # name recorded on new records (default: login name)
# export_dir: exports        # where `lqc export` writes CSV files
#
# workload:
#   slide_limit: 100         # daily slide total that triggers the limit flag
#   time_limit: 480          # daily screening minutes that trigger the limit flag
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_project_layer_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".lqc")).unwrap();
        fs::write(
            tmp.path().join(PROJECT_CONFIG_FILE),
            "author: KM\nworkload:\n  time_limit: 420\n",
        )
        .unwrap();

        let mut config = Config::default();
        config
            .apply_file(&tmp.path().join(PROJECT_CONFIG_FILE))
            .unwrap();

        assert_eq!(config.author.as_deref(), Some("KM"));
        assert_eq!(config.workload.time_limit, 420);
        assert_eq!(config.workload.slide_limit, 100.0);
    }

    #[test]
    fn test_later_layer_keeps_unset_fields() {
        let mut config = Config::default();
        config.apply_layer(ConfigLayer {
            author: Some("AB".to_string()),
            workload: LimitsLayer {
                slide_limit: Some(80.0),
                time_limit: None,
            },
            ..Default::default()
        });
        config.apply_layer(ConfigLayer {
            export_dir: Some(PathBuf::from("out")),
            ..Default::default()
        });

        assert_eq!(config.author.as_deref(), Some("AB"));
        assert_eq!(config.workload.slide_limit, 80.0);
        assert_eq!(config.export_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_env_layer_wins() {
        let mut config = Config {
            author: Some("AB".to_string()),
            ..Default::default()
        };
        config.apply_env(|key| match key {
            "LQC_AUTHOR" => Some("ZZ".to_string()),
            "LQC_EXPORT_DIR" => Some(" ".to_string()),
            _ => None,
        });
        assert_eq!(config.author.as_deref(), Some("ZZ"));
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn test_missing_file_is_ignored() {
        let mut config = Config::default();
        config
            .apply_file(Path::new("/nonexistent/.lqc/config.yaml"))
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "workload: [unclosed").unwrap();
        let mut config = Config::default();
        assert!(config.apply_file(&path).is_err());
    }

    #[test]
    fn test_commented_template_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, PROJECT_CONFIG_TEMPLATE).unwrap();
        let mut config = Config::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config, Config::default());
    }
}
