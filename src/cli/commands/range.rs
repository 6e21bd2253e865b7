//! `lqc range` command - Check and expand accession range expressions

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::output::{effective_format, print_json, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::accession::{count_range, generate_prefix, parse_range};
use crate::core::dates;

#[derive(Subcommand, Debug)]
pub enum RangeCommands {
    /// Check a range expression such as "1-5, 8, 10-12"
    Check(CheckArgs),

    /// Expand a range expression into accession identifiers
    Expand(ExpandArgs),
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Range expression
    pub expr: String,
}

#[derive(clap::Args, Debug)]
pub struct ExpandArgs {
    /// Range expression
    pub expr: String,

    /// Date prepared (YYYY-MM-DD); picks the year prefix, defaults to today
    #[arg(long, short = 'p')]
    pub prepared: Option<String>,
}

pub fn run(cmd: RangeCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RangeCommands::Check(args) => run_check(args),
        RangeCommands::Expand(args) => run_expand(args, global),
    }
}

fn run_check(args: CheckArgs) -> Result<()> {
    match count_range(&args.expr) {
        Ok(count) => {
            println!(
                "{} valid ({} accession{})",
                style("✓").green(),
                count,
                if count == 1 { "" } else { "s" }
            );
            Ok(())
        }
        Err(e) => {
            println!("{} invalid", style("✗").red());
            Err(e.into())
        }
    }
}

fn run_expand(args: ExpandArgs, global: &GlobalOpts) -> Result<()> {
    if let Some(ref prepared) = args.prepared {
        if dates::parse_calendar_date(prepared).is_none() {
            return Err(miette::miette!(
                "date prepared '{}' is not a YYYY-MM-DD calendar date",
                prepared
            ));
        }
    }

    let prefix = generate_prefix(args.prepared.as_deref());
    let accessions = parse_range(&args.expr, &prefix)?;

    match effective_format(global.format, true) {
        OutputFormat::Json => print_json(&accessions)?,
        OutputFormat::Yaml => print_yaml(&accessions)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["accession"]).into_diagnostic()?;
            for accession in &accessions {
                wtr.write_record([accession]).into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        _ => {
            for accession in &accessions {
                println!("{}", accession);
            }
        }
    }
    Ok(())
}
