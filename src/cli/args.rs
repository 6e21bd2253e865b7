//! Top-level argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::case::CaseCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::export::ExportArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::range::RangeCommands;
use crate::cli::commands::stain::StainCommands;
use crate::cli::commands::workload::WorkloadArgs;

#[derive(Parser, Debug)]
#[command(
    name = "lqc",
    version,
    about = "Lab QC Toolkit - daily quality-control records for case screening, pathologist workload and stain QC",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// More log output (repeat for more detail)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new LQC project in the current (or given) directory
    Init(InitArgs),

    /// Check and expand accession range expressions
    #[command(subcommand)]
    Range(RangeCommands),

    /// Track non-gyn cases from preparation to screening
    #[command(subcommand)]
    Case(CaseCommands),

    /// Daily pathologist workload with limit flags
    Workload(WorkloadArgs),

    /// Export cases, workload or stain QC as CSV
    Export(ExportArgs),

    /// Log and review stain QC results
    #[command(subcommand)]
    Stain(StainCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// How command output is rendered
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for lists, YAML for single records
    #[default]
    Auto,
    /// Human-readable table
    Table,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// CSV with quoted fields
    Csv,
    /// Identifiers only, one per line
    Id,
}
