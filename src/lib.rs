//! LQC: Lab QC Toolkit
//!
//! A command-line toolkit for daily laboratory quality-control records:
//! non-gynecological case screening, pathologist workload tracking and stain
//! QC, kept as plain-text YAML files.

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
pub mod yaml;
