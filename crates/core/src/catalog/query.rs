//! Per-item query engine: one search-and-extract cycle per part number.
//!
//! The engine never returns an error. Every way a cycle can go wrong is a
//! value of [`Outcome`], so failure isolation is a type-level guarantee:
//! the loop that drives the engine cannot be aborted by a bad item.

use thiserror::Error;
use tracing::debug;

use super::config::CatalogConfig;
use super::selectors;
use crate::driver::PageDriver;

/// Result of querying one part number.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The catalog reported a weight; value is kilograms.
    Found(f64),
    /// The results view had no weight row. A legitimate terminal outcome,
    /// not an error.
    NotFound,
    /// The cycle failed; the item is skipped and the loop continues.
    Failed(QueryFault),
}

/// Why one item's cycle failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryFault {
    /// The results view did not settle in time.
    #[error("timed out after {ms}ms waiting for results")]
    Timeout { ms: u64 },

    /// Label and value cell sequences were not parallel.
    #[error("results view returned {labels} labels but {values} values")]
    MismatchedCells { labels: usize, values: usize },

    /// The weight cell did not hold a number.
    #[error(transparent)]
    WeightParse(#[from] WeightParseError),

    /// Any other driver-level fault during the cycle.
    #[error("browser fault: {0}")]
    Driver(String),
}

/// The weight cell's text could not be parsed as grams.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{raw}' is not a weight in grams")]
pub struct WeightParseError {
    pub raw: String,
}

/// Shorten a part number before submission by dropping trailing characters.
///
/// The catalog search expects identifiers shortened by one character; the
/// count is configurable rather than inferred. Dropping past the start of
/// the string yields the empty string (submitted as-is, matching nothing).
pub fn normalize_part_number(part_number: &str, drop_trailing: usize) -> String {
    let keep = part_number.chars().count().saturating_sub(drop_trailing);
    part_number.chars().take(keep).collect()
}

/// Parse a catalog gram value (comma decimal separator) into kilograms.
///
/// A weight is a positive, finite number; anything else is a parse fault.
pub fn parse_weight(raw: &str) -> Result<f64, WeightParseError> {
    let fault = || WeightParseError {
        raw: raw.to_string(),
    };
    let grams: f64 = raw.trim().replace(',', ".").parse().map_err(|_| fault())?;
    if !grams.is_finite() || grams <= 0.0 {
        return Err(fault());
    }
    Ok(grams / 1000.0)
}

/// Resolve one part number against the established search view.
///
/// Steps: normalize, submit, wait for the view to settle (bounded by the
/// per-query timeout, plus the fixed settle delay), then scan the parallel
/// label/value cells for the weight marker.
pub async fn query<P: PageDriver>(
    page: &P,
    part_number: &str,
    config: &CatalogConfig,
) -> Outcome {
    let search_key = normalize_part_number(part_number, config.drop_trailing);
    debug!(target = "peso", part_number, %search_key, "submitting search");

    let submitted =
        tokio::time::timeout(config.query_timeout, submit_and_settle(page, &search_key, config))
            .await;
    match submitted {
        Err(_) => {
            return Outcome::Failed(QueryFault::Timeout {
                ms: config.query_timeout.as_millis() as u64,
            });
        }
        Ok(Err(e)) if e.is_timeout() => {
            return Outcome::Failed(QueryFault::Timeout {
                ms: config.query_timeout.as_millis() as u64,
            });
        }
        Ok(Err(e)) => return Outcome::Failed(QueryFault::Driver(e.to_string())),
        Ok(Ok(())) => {}
    }

    // The results table keeps rendering briefly after the network goes
    // quiet; the settle condition alone is not enough.
    tokio::time::sleep(config.settle_delay).await;

    extract_weight(page, config).await
}

async fn submit_and_settle<P: PageDriver>(
    page: &P,
    search_key: &str,
    config: &CatalogConfig,
) -> peso_runtime::Result<()> {
    page.fill(selectors::SEARCH_INPUT, search_key).await?;
    page.press("Enter").await?;
    page.wait_for_network_idle(config.query_timeout).await
}

/// Scan the results view for the weight row.
async fn extract_weight<P: PageDriver>(page: &P, config: &CatalogConfig) -> Outcome {
    let labels = match page.count(selectors::DETAIL_LABEL_CELLS).await {
        Ok(count) => count,
        Err(e) => return driver_fault(e, config),
    };
    let values = match page.count(selectors::DETAIL_VALUE_CELLS).await {
        Ok(count) => count,
        Err(e) => return driver_fault(e, config),
    };
    if labels != values {
        return Outcome::Failed(QueryFault::MismatchedCells { labels, values });
    }

    for index in 0..labels {
        let label = match page.inner_text(selectors::DETAIL_LABEL_CELLS, index).await {
            Ok(text) => text,
            Err(e) => return driver_fault(e, config),
        };
        if !label.contains(selectors::WEIGHT_LABEL_MARKER) {
            continue;
        }

        let raw = match page.inner_text(selectors::DETAIL_VALUE_CELLS, index).await {
            Ok(text) => text,
            Err(e) => return driver_fault(e, config),
        };
        return match parse_weight(raw.trim()) {
            Ok(weight_kg) => Outcome::Found(weight_kg),
            Err(fault) => Outcome::Failed(fault.into()),
        };
    }

    Outcome::NotFound
}

fn driver_fault(error: peso_runtime::Error, config: &CatalogConfig) -> Outcome {
    if error.is_timeout() {
        // A command that timed out mid-scan is still a timeout of this cycle.
        Outcome::Failed(QueryFault::Timeout {
            ms: config.query_timeout.as_millis() as u64,
        })
    } else {
        Outcome::Failed(QueryFault::Driver(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_final_character() {
        assert_eq!(normalize_part_number("77994840", 1), "7799484");
        assert_eq!(normalize_part_number("34343424", 1), "3434342");
    }

    #[test]
    fn normalize_handles_short_and_empty_inputs() {
        assert_eq!(normalize_part_number("7", 1), "");
        assert_eq!(normalize_part_number("", 1), "");
        assert_eq!(normalize_part_number("77", 5), "");
    }

    #[test]
    fn normalize_zero_drop_is_identity() {
        assert_eq!(normalize_part_number("77994840", 0), "77994840");
    }

    #[test]
    fn parse_weight_uses_comma_decimal_separator() {
        assert_eq!(parse_weight("3400,00"), Ok(3.4));
        assert_eq!(parse_weight("1500,0"), Ok(1.5));
        assert_eq!(parse_weight(" 250 "), Ok(0.25));
    }

    #[test]
    fn parse_weight_rejects_garbage() {
        assert!(parse_weight("abc").is_err());
        assert!(parse_weight("").is_err());
        assert!(parse_weight("12,34,56").is_err());
    }

    #[test]
    fn parse_weight_rejects_non_positive_values() {
        assert!(parse_weight("0").is_err());
        assert!(parse_weight("-120,5").is_err());
        assert!(parse_weight("NaN").is_err());
        assert!(parse_weight("inf").is_err());
    }
}
