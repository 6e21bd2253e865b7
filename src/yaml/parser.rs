//! Typed reads of record and config files

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Parse YAML text into a typed value
///
/// `filename` only labels the diagnostic; errors point at the offending
/// line of `content`.
pub fn parse_yaml<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Read and parse a file; a blank file is an error of its own
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(YamlError::Empty(path.to_path_buf()));
    }
    parse_yaml(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::case::CaseRecord;

    #[test]
    fn test_parse_case_yaml() {
        let yaml = "\
id: CASE-01J9ZK3V8Q8M2X1Y4N6P7R5T0W
accession: CN25-014
date_prepared: 2025-05-19
technician: AB
created: 2025-05-19T14:00:00Z
author: lab
";
        let case: CaseRecord = parse_yaml(yaml, "case.lqc.yaml").unwrap();
        assert_eq!(case.accession, "CN25-014");
        assert_eq!(case.date_prepared, "2025-05-19");
        assert_eq!(case.standard_slides, 0);
        assert!(case.pathologist.is_none());
    }

    #[test]
    fn test_parse_invalid_yaml_returns_error() {
        let yaml = "accession: CN25-014\n  invalid indentation: [";
        let result: Result<CaseRecord, _> = parse_yaml(yaml, "case.lqc.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<CaseRecord, _> =
            parse_yaml_file(Path::new("/nonexistent/case.lqc.yaml"));
        assert!(matches!(result, Err(YamlError::Io(_))));
    }

    #[test]
    fn test_blank_file_is_empty_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("case.lqc.yaml");
        std::fs::write(&path, "\n  \n").unwrap();
        let result: Result<CaseRecord, _> = parse_yaml_file(&path);
        assert!(matches!(result, Err(YamlError::Empty(p)) if p == path));
    }
}
