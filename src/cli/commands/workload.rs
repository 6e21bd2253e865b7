//! `lqc workload` command - Daily pathologist workload with limit flags

use miette::Result;

use crate::cli::filters::{DateWindow, SummarySortColumn};
use crate::cli::output::{effective_format, print_json, print_yaml};
use crate::cli::record_cmd::{print_list_footer, print_no_results};
use crate::cli::table::summary_table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::export::{to_csv, workload_columns};
use crate::core::session::Session;
use crate::core::sorting::SortDirection;
use crate::core::workload::{aggregate_with_limits, sort_summaries, WorkloadSummary};
use crate::entities::case::CaseRecord;

#[derive(clap::Args, Debug)]
pub struct WorkloadArgs {
    /// Only this pathologist
    #[arg(long)]
    pub pathologist: Option<String>,

    /// Screened on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Screened on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Only days over the slide or time limit
    #[arg(long)]
    pub over_limit: bool,

    /// Sort by column
    #[arg(long, default_value = "screened")]
    pub sort: SummarySortColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,
}

pub fn run(args: WorkloadArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let summaries = load_summaries(&session, &args)?;

    if summaries.is_empty() {
        print_no_results("workload entries");
        return Ok(());
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Yaml => print_yaml(&summaries)?,
        OutputFormat::Csv => println!("{}", to_csv(&summaries, &workload_columns())?),
        OutputFormat::Id => {
            for s in &summaries {
                println!("{} {}", s.pathologist, s.date_screened);
            }
        }
        _ => {
            println!("{}", summary_table(&summaries));
            let over = summaries.iter().filter(|s| s.limit.is_over()).count();
            print_list_footer(summaries.len(), "workload entries");
            if over > 0 {
                println!(
                    "{} over the limit ({} slides or {} minutes)",
                    console::style(over).red(),
                    session.config().workload.slide_limit,
                    session.config().workload.time_limit
                );
            }
        }
    }
    Ok(())
}

/// Completed cases summarized, filtered and sorted per the arguments
pub(crate) fn load_summaries(
    session: &Session,
    args: &WorkloadArgs,
) -> Result<Vec<WorkloadSummary>> {
    let window = DateWindow::from_args(args.since.clone(), args.until.clone())?;
    let pathologist = args
        .pathologist
        .as_deref()
        .map(|p| p.trim().to_ascii_uppercase());

    let cases = session.store().select_where(|c: &CaseRecord| {
        c.is_completed()
            && pathologist
                .as_deref()
                .is_none_or(|p| c.pathologist.as_deref() == Some(p))
            && window.contains(c.date_screened.as_deref())
    })?;

    let mut summaries: Vec<WorkloadSummary> =
        aggregate_with_limits(&cases, &session.config().workload)
            .into_iter()
            .filter(|s| !args.over_limit || s.limit.is_over())
            .collect();
    sort_summaries(
        &mut summaries,
        args.sort.into(),
        SortDirection::from_reverse(args.reverse),
    );
    Ok(summaries)
}
