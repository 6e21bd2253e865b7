//! `lqc stain` command - Stain QC log

use clap::Subcommand;
use console::style;
use miette::Result;
use tracing::info;

use crate::cli::filters::{CliRating, DateWindow};
use crate::cli::helpers::normalize_initials;
use crate::cli::output::{effective_format, print_json, print_yaml};
use crate::cli::record_cmd::{print_list_footer, print_no_results};
use crate::cli::table::stain_table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::dates::{self, format_for_display};
use crate::core::export::{stain_columns, to_csv};
use crate::core::session::Session;
use crate::entities::stain::{QcRating, StainQcEntry, StainSelection};

#[derive(Subcommand, Debug)]
pub enum StainCommands {
    /// Record a QC result for one or more stains
    Log(LogArgs),

    /// List QC entries
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Stain name; repeat or comma-separate for several (e.g. PAP,GMS)
    #[arg(long, short = 's', required = true, value_delimiter = ',')]
    pub stain: Vec<String>,

    /// QC outcome
    #[arg(long, value_enum)]
    pub rating: CliRating,

    /// Technician initials
    #[arg(long, short = 't')]
    pub tech: String,

    /// QC date (YYYY-MM-DD), defaults to today
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Free-text remarks
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only entries from this date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Only this stain
    #[arg(long, short = 's')]
    pub stain: Option<String>,
}

pub fn run(cmd: StainCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StainCommands::Log(args) => run_log(args, global),
        StainCommands::List(args) => run_list(args, global),
    }
}

fn run_log(args: LogArgs, global: &GlobalOpts) -> Result<()> {
    let date = args.date.unwrap_or_else(dates::today);
    dates::require_past_or_today("QC date", &date)?;
    let tech = normalize_initials(&args.tech)
        .ok_or_else(|| miette::miette!("technician initials '{}' must be 1-4 letters", args.tech))?;

    let selection = StainSelection::from_names(
        args.stain
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty()),
    );
    if selection.is_empty() {
        return Err(miette::miette!("select at least one stain"));
    }

    let session = Session::open()?;
    let author = session.author();
    let rating = QcRating::from(args.rating);
    let notes = args.notes.filter(|n| !n.trim().is_empty());

    let entries: Vec<StainQcEntry> = selection
        .names()
        .into_iter()
        .map(|name| {
            let mut entry = StainQcEntry::new(&date, name, rating, &tech, &author);
            entry.notes = notes.clone();
            entry
        })
        .collect();

    session.store().insert_all(&entries)?;
    info!(count = entries.len(), %rating, "Stain QC logged");

    match global.format {
        OutputFormat::Id => {
            for entry in &entries {
                println!("{}", entry.id);
            }
        }
        _ => {
            let rating_styled = match rating {
                QcRating::Acceptable => style(rating.to_string()).green(),
                QcRating::Unacceptable => style(rating.to_string()).red(),
            };
            println!(
                "{} Logged {} for {} on {}",
                style("✓").green(),
                rating_styled,
                style(selection.names().join(", ")).cyan(),
                format_for_display(Some(date.as_str()))
            );
        }
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let window = DateWindow::from_args(args.date.clone(), args.date)?;
    let stain = args.stain.map(|s| s.trim().to_ascii_uppercase());

    let session = Session::open()?;
    let mut entries = session.store().select_where(|e: &StainQcEntry| {
        window.contains(Some(e.date.as_str()))
            && stain.as_deref().is_none_or(|s| e.stain == s)
    })?;
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.stain.cmp(&b.stain))
    });

    if entries.is_empty() {
        print_no_results("stain QC entries");
        return Ok(());
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Yaml => print_yaml(&entries)?,
        OutputFormat::Csv => println!("{}", to_csv(&entries, &stain_columns())?),
        OutputFormat::Id => {
            for entry in &entries {
                println!("{}", entry.id);
            }
        }
        _ => {
            println!("{}", stain_table(&entries));
            print_list_footer(entries.len(), "stain QC entries");
        }
    }
    Ok(())
}
