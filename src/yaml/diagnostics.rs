//! YAML error types with source-annotated diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// A YAML syntax or shape error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lqc::yaml::syntax), help("fix the record file by hand or restore it from backup"))]
pub struct YamlSyntaxError {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it came from
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err.location().map(|loc| {
            let offset = loc.index().min(content.len());
            SourceSpan::from((offset, 1))
        });
        Self {
            message: format!("invalid YAML in {}: {}", filename, err),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("{0} is empty")]
    #[diagnostic(
        code(lqc::yaml::empty),
        help("an interrupted save can leave an empty record file; delete it and re-enter the record")
    )]
    Empty(PathBuf),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
