//! Chromium-backed implementation of the automation capability.
//!
//! `peso-runtime` owns the process and the DevTools connection; this module
//! turns them into a [`PageDriver`] the catalog core can consume.

mod js;
mod page;

pub use page::CdpPage;

use async_trait::async_trait;
use peso_runtime::{LaunchConfig, Result};

use crate::driver::BrowserDriver;

/// Launcher for the Chromium DevTools backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chromium;

#[async_trait]
impl BrowserDriver for Chromium {
    type Page = CdpPage;

    async fn launch(&self, config: &LaunchConfig) -> Result<CdpPage> {
        CdpPage::open(config).await
    }
}
