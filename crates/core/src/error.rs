//! Fatal error taxonomy for a catalog run.
//!
//! Everything here aborts the whole run (after guaranteed session cleanup).
//! Per-item faults are not errors at this level; they are values of
//! [`crate::catalog::Outcome`] and never cross the engine boundary.

use thiserror::Error;

/// Result type alias for catalog runs.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a catalog run.
#[derive(Debug, Error)]
pub enum Error {
    /// Browser executable could not be located. Surfaced before any network
    /// activity; no session was attempted.
    #[error("browser configuration error: {0}")]
    Config(#[source] peso_runtime::Error),

    /// The browser or its DevTools connection failed to come up.
    #[error("browser launch failed: {0}")]
    Launch(#[source] peso_runtime::Error),

    /// Login form did not resolve within the login timeout. Without a
    /// session no per-item retry is meaningful, so this is fatal.
    #[error("login did not settle within {timeout_ms}ms")]
    Auth {
        /// The configured login timeout.
        timeout_ms: u64,
    },

    /// The fixed menu sequence to the part search view could not be
    /// completed.
    #[error("navigation to part search failed at '{step}': {source}")]
    Navigation {
        /// The navigation step that failed.
        step: &'static str,
        /// Driver-level cause.
        #[source]
        source: peso_runtime::Error,
    },
}
