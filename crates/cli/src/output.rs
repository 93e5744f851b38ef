//! Result rendering for humans and for downstream tooling.

use colored::Colorize;
use peso::ResultSet;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Print the result set on stdout and a summary on stderr.
pub fn print_results(results: &ResultSet, total: usize, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results)?);
        }
        OutputFormat::Text => {
            for (part_number, weight_kg) in results.iter() {
                println!("{part_number}\t{weight_kg:.3}");
            }
        }
    }

    let summary = format!("{} of {} part numbers resolved", results.len(), total);
    if results.len() == total {
        eprintln!("{}", summary.green());
    } else {
        eprintln!("{}", summary.yellow());
    }
    Ok(())
}
