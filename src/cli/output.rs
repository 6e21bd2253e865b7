//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Table
            } else {
                OutputFormat::Yaml
            }
        }
        other => other,
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Print a value as YAML
pub fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}
