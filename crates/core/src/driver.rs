//! The browser automation capability the catalog core consumes.
//!
//! The catalog modules never name a concrete automation product; they are
//! written against these two traits. [`crate::cdp::Chromium`] implements
//! them over the DevTools protocol, and the test suite substitutes scripted
//! stubs (including a stub that asserts zero launches for empty input).

use std::time::Duration;

use async_trait::async_trait;
use peso_runtime::{LaunchConfig, Result};

/// One live page of an automated browser.
///
/// Selectors are CSS. `click_text`/`hover_text` address elements by their
/// visible text, mirroring the menu entries the catalog exposes without
/// stable identifiers.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Replace the value of the first element matching `selector`.
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Click the `index`-th (zero-based) element matching `selector`.
    async fn click_nth(&self, selector: &str, index: usize) -> Result<()>;

    /// Click the first element whose visible text matches `text`.
    async fn click_text(&self, text: &str) -> Result<()>;

    /// Hover the first element whose visible text matches `text`.
    async fn hover_text(&self, text: &str) -> Result<()>;

    /// Select an option of a `<select>` element by value or label.
    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    /// Dispatch a key press (down + up) to the focused element.
    async fn press(&self, key: &str) -> Result<()>;

    /// Wait until the page has had no network activity for a quiet window,
    /// bounded by `timeout`.
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()>;

    /// Number of elements matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Rendered text of the `index`-th element matching `selector`.
    async fn inner_text(&self, selector: &str, index: usize) -> Result<String>;

    /// Release the page and whatever backs it. Called exactly once.
    async fn close(&self) -> Result<()>;
}

/// Launcher for the automation capability.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Concrete page type this driver produces.
    type Page: PageDriver;

    /// Launch a browser and open one page.
    ///
    /// Implementations must resolve the executable location before any
    /// network activity so a misconfigured path fails fast.
    async fn launch(&self, config: &LaunchConfig) -> Result<Self::Page>;
}
