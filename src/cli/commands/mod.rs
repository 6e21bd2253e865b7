//! CLI command implementations

pub mod case;
pub mod completions;
pub mod export;
pub mod init;
pub mod range;
pub mod stain;
pub mod workload;
