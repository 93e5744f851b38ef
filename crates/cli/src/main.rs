mod cli;
mod error;
mod input;
mod logging;
mod output;

use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use peso::{CatalogConfig, Chromium, Credentials, LaunchConfig, ResultSet, scrape_weights};

use crate::cli::Cli;
use crate::error::{CliError, Result};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{} {err}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut part_numbers = cli.part_numbers.clone();
    if let Some(path) = &cli.input {
        part_numbers.extend(input::read_part_file(path)?);
    }

    // An empty list never establishes a session.
    if part_numbers.is_empty() {
        return output::print_results(&ResultSet::new(), 0, cli.format);
    }

    let credentials = resolve_credentials(&cli)?;
    let launch = LaunchConfig {
        executable: cli.chromium.clone(),
        headless: !cli.headful,
        extra_args: Vec::new(),
    };
    let config = CatalogConfig {
        login_timeout: Duration::from_millis(cli.login_timeout),
        query_timeout: Duration::from_millis(cli.query_timeout),
        settle_delay: Duration::from_millis(cli.settle_delay),
        item_pace: Duration::from_millis(cli.item_pace),
        ..CatalogConfig::default()
    };

    let results = scrape_weights(&Chromium, &credentials, &part_numbers, &launch, &config).await?;
    output::print_results(&results, part_numbers.len(), cli.format)
}

fn resolve_credentials(cli: &Cli) -> Result<Credentials> {
    let username = cli
        .username
        .clone()
        .or_else(|| std::env::var("EPER_USERNAME").ok());
    let password = cli
        .password
        .clone()
        .or_else(|| std::env::var("EPER_PASSWORD").ok());

    match (username, password) {
        (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
        _ => Err(CliError::MissingCredentials),
    }
}
