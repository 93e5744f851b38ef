//! Wire types for the Chrome DevTools Protocol.
//!
//! This crate contains the serde-serializable types used for communication
//! with a Chromium browser over its DevTools WebSocket. These types represent
//! the "protocol layer" - the shapes of data as they appear on the wire.
//!
//! Types in this crate are pure data: no behavior beyond serialization and
//! deserialization. Higher-level ergonomic APIs are built on top of them in
//! `peso-runtime` and `peso`.

pub mod message;
pub mod methods;

pub use message::*;
pub use methods::*;
