//! `lqc case` command - Non-gyn case tracking from preparation to screening

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::cli::filters::{CaseSortColumn, CaseStatusFilter, DateWindow};
use crate::cli::helpers::{normalize_initials, read_lines_from_stdin, stdin_has_data};
use crate::cli::output::{effective_format, print_json, print_yaml};
use crate::cli::record_cmd::{find_case, output_new_cases, print_list_footer, print_no_results};
use crate::cli::table::case_table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::accession::{count_range, generate_prefix, parse_range};
use crate::core::dates::{self, format_for_display};
use crate::core::export::{case_columns, to_csv};
use crate::core::identity::{new_range_group, RecordId};
use crate::core::session::Session;
use crate::core::sorting::SortDirection;
use crate::entities::case::{sort_cases, CaseRecord, CaseUpdate, PendingUpdates};

/// Largest batch a single range entry may create
pub const MAX_CASES_PER_ENTRY: u64 = 500;

#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// Register prepared cases from an accession range
    New(NewArgs),

    /// List cases with filtering
    List(ListArgs),

    /// Show a case's details
    Show(ShowArgs),

    /// Record screening results for one or more cases
    Complete(CompleteArgs),

    /// Change fields on a case
    Edit(EditArgs),

    /// Delete a case
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Accession numbers, e.g. "1-5, 8, 10-12"
    #[arg(long, short = 'r')]
    pub range: String,

    /// Date prepared (YYYY-MM-DD), defaults to today
    #[arg(long, short = 'p')]
    pub prepared: Option<String>,

    /// Technician initials
    #[arg(long, short = 't')]
    pub tech: String,

    /// Conventional slides per case
    #[arg(long, default_value_t = 1)]
    pub standard: u32,

    /// Liquid-based slides per case
    #[arg(long, default_value_t = 0)]
    pub lb: u32,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: CaseStatusFilter,

    /// Filter by pathologist initials
    #[arg(long)]
    pub pathologist: Option<String>,

    /// Filter by technician initials
    #[arg(long)]
    pub tech: Option<String>,

    /// Prepared on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Prepared on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Sort by column
    #[arg(long, default_value = "accession")]
    pub sort: CaseSortColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Accession (e.g. CN25-014) or record id
    pub accession: String,
}

#[derive(clap::Args, Debug)]
pub struct CompleteArgs {
    /// Accessions to complete (read from stdin when omitted)
    pub accessions: Vec<String>,

    /// Date screening finished (YYYY-MM-DD)
    #[arg(long)]
    pub screened: String,

    /// Pathologist initials
    #[arg(long)]
    pub pathologist: String,

    /// Screening time in minutes, per case
    #[arg(long)]
    pub minutes: u32,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Accession (e.g. CN25-014) or record id
    pub accession: String,

    /// New date prepared (must stay in the accession's year)
    #[arg(long)]
    pub prepared: Option<String>,

    /// New technician initials
    #[arg(long)]
    pub tech: Option<String>,

    /// New conventional slide count
    #[arg(long)]
    pub standard: Option<u32>,

    /// New liquid-based slide count
    #[arg(long)]
    pub lb: Option<u32>,

    /// New date screened (completed cases)
    #[arg(long)]
    pub screened: Option<String>,

    /// New pathologist initials (completed cases)
    #[arg(long)]
    pub pathologist: Option<String>,

    /// New screening time in minutes (completed cases)
    #[arg(long)]
    pub minutes: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Accession (e.g. CN25-014) or record id
    pub accession: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a case subcommand
pub fn run(cmd: CaseCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CaseCommands::New(args) => run_new(args, global),
        CaseCommands::List(args) => run_list(args, global),
        CaseCommands::Show(args) => run_show(args, global),
        CaseCommands::Complete(args) => run_complete(args, global),
        CaseCommands::Edit(args) => run_edit(args),
        CaseCommands::Delete(args) => run_delete(args),
    }
}

fn initials(label: &str, raw: &str) -> Result<String> {
    normalize_initials(raw)
        .ok_or_else(|| miette::miette!("{} initials '{}' must be 1-4 letters", label, raw))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;

    let prepared = args.prepared.unwrap_or_else(dates::today);
    dates::require_past_or_today("date prepared", &prepared)?;
    let tech = initials("technician", &args.tech)?;

    let count = count_range(&args.range)?;
    if count > MAX_CASES_PER_ENTRY {
        return Err(miette::miette!(
            "range '{}' would create {} cases; enter at most {} at a time",
            args.range,
            count,
            MAX_CASES_PER_ENTRY
        ));
    }

    let prefix = generate_prefix(Some(&prepared));
    let accessions = parse_range(&args.range, &prefix)?;
    let group = new_range_group();
    let author = session.author();

    let cases: Vec<CaseRecord> = accessions
        .iter()
        .map(|accession| {
            let mut case = CaseRecord::new(accession, &prepared, &tech, &author);
            case.standard_slides = args.standard;
            case.lb_slides = args.lb;
            case.range_group = Some(group.clone());
            case
        })
        .collect();

    session.store().insert_all(&cases)?;
    info!(count = cases.len(), range_group = %group, "Cases created");

    output_new_cases(&cases, global);
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let window = DateWindow::from_args(args.since, args.until)?;
    let pathologist = args.pathologist.map(|p| p.trim().to_ascii_uppercase());
    let tech = args.tech.map(|t| t.trim().to_ascii_uppercase());

    let mut cases = session.store().select_where(|c: &CaseRecord| {
        args.status.matches(&c.status())
            && pathologist
                .as_deref()
                .is_none_or(|p| c.pathologist.as_deref() == Some(p))
            && tech.as_deref().is_none_or(|t| c.technician == t)
            && window.contains(Some(c.date_prepared.as_str()))
    })?;

    sort_cases(
        &mut cases,
        args.sort.into(),
        SortDirection::from_reverse(args.reverse),
    );
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }

    if args.count {
        println!("{}", cases.len());
        return Ok(());
    }

    if cases.is_empty() {
        print_no_results("cases");
        return Ok(());
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => print_json(&cases)?,
        OutputFormat::Yaml => print_yaml(&cases)?,
        OutputFormat::Csv => println!("{}", to_csv(&cases, &case_columns())?),
        OutputFormat::Id => {
            for case in &cases {
                println!("{}", case.accession);
            }
        }
        _ => {
            println!("{}", case_table(&cases));
            print_list_footer(cases.len(), "case(s)");
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let case = find_case(session.store(), &args.accession)?;

    match effective_format(global.format, false) {
        OutputFormat::Json => print_json(&case)?,
        OutputFormat::Yaml => print_yaml(&case)?,
        OutputFormat::Csv => println!("{}", to_csv(&[&case], &case_columns())?),
        OutputFormat::Id => println!("{}", case.accession),
        _ => print_case(&case),
    }
    Ok(())
}

fn print_case(case: &CaseRecord) {
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}  {}",
        style("Accession").bold(),
        style(&case.accession).cyan(),
        style(case.status()).yellow()
    );
    println!(
        "{}: {} by {}",
        style("Prepared").bold(),
        format_for_display(Some(case.date_prepared.as_str())),
        case.technician
    );
    println!(
        "{}: {} standard, {} liquid-based",
        style("Slides").bold(),
        case.standard_slides,
        case.lb_slides
    );
    if case.is_completed() {
        println!(
            "{}: {} by {} ({} min)",
            style("Screened").bold(),
            format_for_display(case.date_screened.as_deref()),
            case.pathologist.as_deref().unwrap_or("-"),
            case.time_minutes.unwrap_or(0)
        );
    }
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {}",
        style("Entered by").dim(),
        case.author,
        style("Id").dim(),
        case.id
    );
}

fn run_complete(args: CompleteArgs, global: &GlobalOpts) -> Result<()> {
    let keys = if args.accessions.is_empty() {
        read_lines_from_stdin()
            .ok_or_else(|| miette::miette!("no accessions given (pass them as arguments or on stdin)"))?
    } else {
        args.accessions
    };

    dates::require_past_or_today("date screened", &args.screened)?;
    let pathologist = initials("pathologist", &args.pathologist)?;

    let session = Session::open()?;
    let store = session.store();

    let mut cases: BTreeMap<RecordId, CaseRecord> = BTreeMap::new();
    let mut pending = PendingUpdates::new();
    for key in &keys {
        let case = find_case(store, key)?;
        if args.screened < case.date_prepared {
            return Err(miette::miette!(
                "{} was prepared {}; it cannot be screened on {}",
                case.accession,
                case.date_prepared,
                args.screened
            ));
        }
        if case.is_completed() {
            warn!(accession = %case.accession, "Overwriting an earlier completion");
        }
        pending.stage(
            case.id,
            CaseUpdate::completion(&args.screened, &pathologist, args.minutes),
        );
        cases.insert(case.id, case);
    }

    // Apply everything first so a bad record leaves the store untouched
    let mut completed = Vec::with_capacity(pending.len());
    for (id, update) in pending.drain() {
        let Some(mut case) = cases.remove(&id) else {
            continue;
        };
        case.apply(&update)?;
        completed.push(case);
    }
    for case in &completed {
        store.update(case)?;
    }
    info!(count = completed.len(), pathologist = %pathologist, "Cases completed");

    match global.format {
        OutputFormat::Id => {
            for case in &completed {
                println!("{}", case.accession);
            }
        }
        _ => {
            println!(
                "{} Completed {} case(s) screened {} by {}",
                style("✓").green(),
                completed.len(),
                style(format_for_display(Some(args.screened.as_str()))).yellow(),
                style(&pathologist).cyan()
            );
            for case in &completed {
                println!("   {}", style(&case.accession).cyan());
            }
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let session = Session::open()?;
    let mut case = find_case(session.store(), &args.accession)?;

    if let Some(ref prepared) = args.prepared {
        dates::require_past_or_today("date prepared", prepared)?;
        let prefix = generate_prefix(Some(prepared));
        if !case.accession.starts_with(&prefix) {
            return Err(miette::miette!(
                "{} belongs to a different year than {}; delete and re-enter the case instead",
                case.accession,
                prepared
            ));
        }
    }
    if let Some(ref screened) = args.screened {
        dates::require_past_or_today("date screened", screened)?;
    }

    let update = CaseUpdate {
        date_prepared: args.prepared,
        date_screened: args.screened,
        technician: args
            .tech
            .as_deref()
            .map(|t| initials("technician", t))
            .transpose()?,
        pathologist: args
            .pathologist
            .as_deref()
            .map(|p| initials("pathologist", p))
            .transpose()?,
        standard_slides: args.standard,
        lb_slides: args.lb,
        time_minutes: args.minutes,
    };
    if update.is_empty() {
        return Err(miette::miette!("nothing to change; pass at least one field flag"));
    }

    case.apply(&update)?;
    if let Some(ref screened) = case.date_screened {
        if *screened < case.date_prepared {
            return Err(miette::miette!(
                "{} would be screened ({}) before it was prepared ({})",
                case.accession,
                screened,
                case.date_prepared
            ));
        }
    }

    session.store().update(&case)?;
    info!(accession = %case.accession, "Case updated");

    println!(
        "{} Updated case {}",
        style("✓").green(),
        style(&case.accession).cyan()
    );
    Ok(())
}

fn run_delete(args: DeleteArgs) -> Result<()> {
    let session = Session::open()?;
    let case = find_case(session.store(), &args.accession)?;

    if !args.yes {
        if stdin_has_data() {
            return Err(miette::miette!(
                "refusing to delete {} without confirmation; pass --yes",
                case.accession
            ));
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete case {}?", case.accession))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    session.store().delete::<CaseRecord>(&case.id)?;
    info!(accession = %case.accession, "Case deleted");

    println!(
        "{} Deleted case {}",
        style("✓").green(),
        style(&case.accession).cyan()
    );
    Ok(())
}
