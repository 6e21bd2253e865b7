//! `lqc export` command - CSV export of cases, workload and stain QC

use clap::ValueEnum;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::commands::workload::{load_summaries, WorkloadArgs};
use crate::cli::filters::{DateWindow, SummarySortColumn};
use crate::core::dates;
use crate::core::export::{
    case_columns, default_filename, download, stain_columns, to_csv, workload_columns,
    DirectorySink, StdoutSink,
};
use crate::core::session::Session;
use crate::core::sorting::SortDirection;
use crate::entities::case::{sort_cases, CaseRecord, CaseSortKey};
use crate::entities::stain::StainQcEntry;

/// What to export
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExportKind {
    Cases,
    Workload,
    Stains,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Cases => write!(f, "cases"),
            ExportKind::Workload => write!(f, "workload"),
            ExportKind::Stains => write!(f, "stains"),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum)]
    pub what: ExportKind,

    /// Directory to write into (defaults to the configured export directory)
    #[arg(long, short = 'o', conflicts_with = "stdout")]
    pub out: Option<PathBuf>,

    /// Write the CSV to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// File name (defaults to <what>-<today>.csv)
    #[arg(long)]
    pub filename: Option<String>,

    /// Only records dated on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Only records dated on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,
}

pub fn run(args: ExportArgs) -> Result<()> {
    let session = Session::open()?;
    let (rows, csv_text) = build_csv(&session, &args)?;

    if rows == 0 {
        println!("No {} to export.", args.what);
        return Ok(());
    }

    let filename = args
        .filename
        .clone()
        .unwrap_or_else(|| default_filename(&args.what.to_string(), &dates::today()));

    if args.stdout {
        download(&StdoutSink, &csv_text, &filename)?;
        println!();
        return Ok(());
    }

    let dir = args.out.clone().unwrap_or_else(|| session.export_dir());
    let sink = DirectorySink::new(dir);
    download(&sink, &csv_text, &filename)?;

    println!(
        "{} Exported {} {} row(s) to {}",
        style("✓").green(),
        rows,
        args.what,
        style(sink.path_for(&filename).display()).cyan()
    );
    Ok(())
}

/// Row count and CSV text for the requested export
fn build_csv(session: &Session, args: &ExportArgs) -> Result<(usize, String)> {
    match args.what {
        ExportKind::Cases => {
            let window = DateWindow::from_args(args.since.clone(), args.until.clone())?;
            let mut cases = session
                .store()
                .select_where(|c: &CaseRecord| window.contains(Some(c.date_prepared.as_str())))?;
            sort_cases(&mut cases, CaseSortKey::Accession, SortDirection::Ascending);
            Ok((cases.len(), to_csv(&cases, &case_columns())?))
        }
        ExportKind::Workload => {
            let workload_args = WorkloadArgs {
                pathologist: None,
                since: args.since.clone(),
                until: args.until.clone(),
                over_limit: false,
                sort: SummarySortColumn::Screened,
                reverse: false,
            };
            let summaries = load_summaries(session, &workload_args)?;
            Ok((summaries.len(), to_csv(&summaries, &workload_columns())?))
        }
        ExportKind::Stains => {
            let window = DateWindow::from_args(args.since.clone(), args.until.clone())?;
            let mut entries = session
                .store()
                .select_where(|e: &StainQcEntry| window.contains(Some(e.date.as_str())))?;
            entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.stain.cmp(&b.stain)));
            Ok((entries.len(), to_csv(&entries, &stain_columns())?))
        }
    }
}
