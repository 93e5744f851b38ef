//! Peso Runtime - Browser lifecycle, connection, and event dispatch
//!
//! This crate provides the low-level runtime infrastructure for talking to a
//! Chromium browser over the DevTools protocol:
//!
//! - **Browser management**: Locating the executable and launching/reaping
//!   the browser process
//! - **Transport**: Bidirectional communication over the DevTools WebSocket
//! - **Connection**: Command/response correlation and event broadcast
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    peso     │  Page API and catalog core
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ peso-runtime│  This crate
//! │  ┌────────┐ │
//! │  │ Conn   │ │  Command/response correlation
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Trans  │ │  WebSocket transport
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Browser│ │  Process management
//! │  └────────┘ │
//! └─────────────┘
//! ```

pub mod browser;
pub mod connection;
pub mod error;
pub mod transport;

// Re-export key types at crate root
pub use browser::{BrowserProcess, LaunchConfig, resolve_executable};
pub use connection::Connection;
pub use error::{Error, Result};
pub use transport::{Transport, TransportParts};
