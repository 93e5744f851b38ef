//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Batch-enrich a part-number list with weights from the E-PER catalog.
#[derive(Debug, Parser)]
#[command(name = "peso", version, about)]
pub struct Cli {
    /// Part numbers to look up (alternatively --input)
    #[arg(value_name = "PART_NUMBER")]
    pub part_numbers: Vec<String>,

    /// Read part numbers from a file, one per line ('#' starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Catalog username (falls back to EPER_USERNAME)
    #[arg(long, value_name = "USER")]
    pub username: Option<String>,

    /// Catalog password (falls back to EPER_PASSWORD)
    #[arg(long, value_name = "PASS")]
    pub password: Option<String>,

    /// Path to the Chromium executable (falls back to PESO_CHROMIUM, then PATH)
    #[arg(long, value_name = "PATH")]
    pub chromium: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub headful: bool,

    /// Login settle timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 60_000)]
    pub login_timeout: u64,

    /// Per-item settle timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 50_000)]
    pub query_timeout: u64,

    /// Fixed extra wait after each settle, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 2_000)]
    pub settle_delay: u64,

    /// Pause between consecutive items, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    pub item_pace: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated `part-number<TAB>weight` lines plus a summary on stderr
    Text,
    /// One JSON object, keys in input order
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_parts_and_flags_parse() {
        let cli = Cli::try_parse_from([
            "peso",
            "77994840",
            "34343424",
            "--username",
            "SC00000",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.part_numbers, ["77994840", "34343424"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.headful);
    }

    #[test]
    fn timeouts_default_to_catalog_values() {
        let cli = Cli::try_parse_from(["peso"]).unwrap();
        assert_eq!(cli.login_timeout, 60_000);
        assert_eq!(cli.query_timeout, 50_000);
        assert_eq!(cli.settle_delay, 2_000);
        assert_eq!(cli.item_pace, 1_000);
        assert_eq!(cli.format, OutputFormat::Text);
    }
}
