//! peso: per-part weight enrichment from the E-PER parts catalog
//!
//! This crate drives an authenticated browser session through the catalog's
//! fixed navigation path and issues one search-and-extract operation per part
//! identifier, producing a best-effort mapping from part number to weight in
//! kilograms.
//!
//! # Example
//!
//! ```ignore
//! use peso::{CatalogConfig, Chromium, Credentials, LaunchConfig, scrape_weights};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("user", "secret");
//!     let part_numbers = vec!["77994840".to_string(), "34343424".to_string()];
//!
//!     let weights = scrape_weights(
//!         &Chromium,
//!         &credentials,
//!         &part_numbers,
//!         &LaunchConfig::default(),
//!         &CatalogConfig::default(),
//!     )
//!     .await?;
//!
//!     for (part_number, kg) in weights.iter() {
//!         println!("{part_number}: {kg:.3} kg");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The catalog core depends only on the capability surface in [`driver`];
//! [`cdp`] provides the Chromium-backed implementation of that surface and
//! tests substitute scripted stubs.

pub mod catalog;
pub mod cdp;
pub mod driver;
pub mod error;

pub use catalog::{
    CatalogConfig, Credentials, Outcome, QueryFault, ResultSet, Session, WeightParseError,
    normalize_part_number, parse_weight, scrape_weights,
};
pub use cdp::Chromium;
pub use driver::{BrowserDriver, PageDriver};
pub use error::{Error, Result};

// Re-export the launch configuration so callers need only this crate.
pub use peso_runtime::LaunchConfig;
