//! Message envelopes for the DevTools WebSocket.
//!
//! Every frame on the wire is one of three shapes:
//! - a command (outbound, carries an `id`),
//! - a response (inbound, echoes the command `id`),
//! - an event (inbound, has a `method` but no `id`).
//!
//! Commands and responses addressed to an attached target additionally carry
//! a `sessionId` (flat session mode).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent to the browser or to an attached target session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Unique command ID for correlating the response.
    pub id: u32,
    /// Method name, e.g. `"Page.navigate"`.
    pub method: String,
    /// Method parameters as a JSON object.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
    /// Target session this command is addressed to, if any.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Response message correlated to a command by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Command ID this response correlates to.
    pub id: u32,
    /// Success result (mutually exclusive with `error`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error result (mutually exclusive with `result`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    /// Session the original command was addressed to, if any.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Error details attached to a failed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Protocol error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Additional detail, if the browser provided any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Event pushed by the browser (no `id` field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event method name, e.g. `"Network.loadingFinished"`.
    pub method: String,
    /// Event parameters as a JSON object.
    #[serde(default)]
    pub params: Value,
    /// Session that emitted the event, if it came from an attached target.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Discriminated union of inbound protocol messages.
///
/// Responses carry an `id`, events do not; serde's untagged representation
/// resolves the two without an explicit discriminator.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// Response message (has `id` field).
    Response(Response),
    /// Event message (has `method`, no `id`).
    Event(Event),
    /// Unknown message type (forward-compatible catch-all).
    Unknown(Value),
}
