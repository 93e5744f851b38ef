//! The authenticated query loop: one session, one query per part number,
//! best-effort collection of the outcomes.

pub mod config;
pub mod query;
pub mod results;
pub mod selectors;
pub mod session;

pub use config::{CatalogConfig, Credentials, DEFAULT_LOGIN_MODE, DEFAULT_LOGIN_URL};
pub use query::{Outcome, QueryFault, WeightParseError, normalize_part_number, parse_weight};
pub use results::ResultSet;
pub use session::Session;

use tracing::{debug, info, warn};

use crate::driver::BrowserDriver;
use crate::error::Result;
use peso_runtime::LaunchConfig;

/// Run the whole pipeline: establish one session, query every part number
/// in order, fold the outcomes into a [`ResultSet`].
///
/// Per-item faults are logged and skipped; only session establishment can
/// fail the run. The session is closed on every exit path. An empty input
/// list returns an empty set without launching anything.
pub async fn scrape_weights<B: BrowserDriver>(
    driver: &B,
    credentials: &Credentials,
    part_numbers: &[String],
    launch: &LaunchConfig,
    config: &CatalogConfig,
) -> Result<ResultSet> {
    if part_numbers.is_empty() {
        debug!(target = "peso", "no part numbers provided; skipping session");
        return Ok(ResultSet::new());
    }

    info!(
        target = "peso",
        items = part_numbers.len(),
        "starting catalog scrape"
    );

    let session = Session::establish(driver, credentials, launch, config).await?;

    let mut results = ResultSet::new();
    for (index, part_number) in part_numbers.iter().enumerate() {
        let outcome = query::query(session.page(), part_number, config).await;
        match &outcome {
            Outcome::Found(weight_kg) => {
                info!(target = "peso", %part_number, weight_kg, "weight resolved");
            }
            Outcome::NotFound => {
                info!(target = "peso", %part_number, "no weight recorded for part");
            }
            Outcome::Failed(fault) => {
                warn!(target = "peso", %part_number, %fault, "query failed; skipping item");
            }
        }
        results.record(part_number, &outcome);

        if index + 1 < part_numbers.len() {
            tokio::time::sleep(config.item_pace).await;
        }
    }

    session.close().await;

    info!(
        target = "peso",
        resolved = results.len(),
        total = part_numbers.len(),
        "scrape complete"
    );
    Ok(results)
}
