//! YAML reading for record and config files
//!
//! Parse failures carry the file text so miette can point at the bad line.

pub mod diagnostics;
pub mod parser;

pub use diagnostics::{YamlError, YamlSyntaxError};
pub use parser::{parse_yaml, parse_yaml_file};
