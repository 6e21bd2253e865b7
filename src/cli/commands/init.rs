//! `lqc init` command - Create a project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::config::PROJECT_CONFIG_FILE;
use crate::core::project::Project;
use crate::core::record::Record;
use crate::entities::{CaseRecord, StainQcEntry};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> Result<()> {
    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir().into_diagnostic()?,
    };

    let project = Project::init(&root)?;
    tracing::info!(root = %project.root().display(), "Project initialized");

    println!(
        "{} Initialized LQC project in {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    println!("   {:<20} case records", format!("{}/", CaseRecord::DIR));
    println!("   {:<20} stain QC entries", format!("{}/", StainQcEntry::DIR));
    println!("   {:<20} project settings", PROJECT_CONFIG_FILE);

    Ok(())
}
