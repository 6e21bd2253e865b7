//! Shared record command infrastructure
//!
//! Lookup and messaging used by the case and stain commands.

use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordId;
use crate::core::store::YamlStore;
use crate::entities::case::CaseRecord;

// =========================================================================
// Lookup
// =========================================================================

/// Find a case by accession (case-insensitive) or by full record id
pub fn find_case(store: &YamlStore, key: &str) -> Result<CaseRecord> {
    if let Ok(id) = RecordId::parse(key) {
        return Ok(store.get::<CaseRecord>(&id)?);
    }

    let accession = key.trim().to_ascii_uppercase();
    store
        .find_by_unique_key::<CaseRecord>(&accession)?
        .ok_or_else(|| miette::miette!("No case found matching '{}'", key))
}

// =========================================================================
// Output Helpers
// =========================================================================

/// Report newly created cases
pub fn output_new_cases(cases: &[CaseRecord], global: &GlobalOpts) {
    match global.format {
        OutputFormat::Id => {
            for case in cases {
                println!("{}", case.accession);
            }
        }
        _ => {
            let (Some(first), Some(last)) = (cases.first(), cases.last()) else {
                return;
            };
            let span = if cases.len() == 1 {
                style(first.accession.clone()).cyan().to_string()
            } else {
                format!(
                    "{} .. {}",
                    style(&first.accession).cyan(),
                    style(&last.accession).cyan()
                )
            };
            println!(
                "{} Created {} case(s) {}",
                style("✓").green(),
                cases.len(),
                span
            );
            println!(
                "   prepared {} by {}",
                style(&first.date_prepared).yellow(),
                style(&first.technician).yellow()
            );
        }
    }
}

/// Print "No X found" message
pub fn print_no_results(name_plural: &str) {
    println!("No {} found.", name_plural);
}

/// Print list footer with count
pub fn print_list_footer(count: usize, name_plural: &str) {
    println!();
    println!("{} {} found.", style(count).cyan(), name_plural);
}
