//! Error types for the browser runtime.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the browser runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Browser executable was not found at the configured location.
    #[error("chromium executable not found at {}", path.display())]
    BrowserNotFound {
        /// The location that was checked.
        path: PathBuf,
    },

    /// No browser executable could be located by any discovery strategy.
    #[error(
        "no chromium executable found; pass one explicitly or set PESO_CHROMIUM"
    )]
    BrowserNotDiscovered,

    /// Failed to launch the browser process.
    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to establish the DevTools WebSocket connection.
    #[error("failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Transport-level error (WebSocket communication).
    #[error("transport error: {0}")]
    TransportError(String),

    /// Protocol-level error (malformed or unexpected frames).
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// Command rejected by the browser.
    #[error("browser error: {message}")]
    Cdp {
        /// Protocol error code reported by the browser.
        code: i64,
        /// Human-readable error message.
        message: String,
    },

    /// JavaScript evaluation threw in the page.
    #[error("javascript evaluation failed: {0}")]
    Evaluation(String),

    /// Element not found by selector.
    #[error("element not found: selector '{0}'")]
    ElementNotFound(String),

    /// Timeout waiting for an operation.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Connection closed while a command was in flight.
    #[error("connection closed unexpectedly")]
    ChannelClosed,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if this error reports a missing browser executable.
    pub fn is_browser_not_found(&self) -> bool {
        matches!(
            self,
            Error::BrowserNotFound { .. } | Error::BrowserNotDiscovered
        )
    }

    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
