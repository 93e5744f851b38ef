//! Typed parameters and results for the protocol methods this workspace
//! actually issues.
//!
//! Field names follow the DevTools schema (camelCase on the wire). Each
//! params struct carries its method name as an associated constant so call
//! sites never spell raw method strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Target.createTarget` - open a new page target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTarget<'a> {
    pub url: &'a str,
}

impl CreateTarget<'_> {
    pub const METHOD: &'static str = "Target.createTarget";
}

/// Result of `Target.createTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
    pub target_id: String,
}

/// `Target.attachToTarget` - attach in flat session mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTarget<'a> {
    pub target_id: &'a str,
    pub flatten: bool,
}

impl AttachToTarget<'_> {
    pub const METHOD: &'static str = "Target.attachToTarget";
}

/// Result of `Target.attachToTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetResult {
    pub session_id: String,
}

/// `Target.closeTarget`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTarget<'a> {
    pub target_id: &'a str,
}

impl CloseTarget<'_> {
    pub const METHOD: &'static str = "Target.closeTarget";
}

/// `Page.navigate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigate<'a> {
    pub url: &'a str,
}

impl Navigate<'_> {
    pub const METHOD: &'static str = "Page.navigate";
}

/// `Runtime.evaluate` with by-value results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluate<'a> {
    pub expression: &'a str,
    pub return_by_value: bool,
    pub await_promise: bool,
}

impl Evaluate<'_> {
    pub const METHOD: &'static str = "Runtime.evaluate";
}

/// Result of `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    pub result: RemoteObject,
    pub exception_details: Option<ExceptionDetails>,
}

/// A JavaScript value mirrored over the protocol.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Exception raised while evaluating an expression.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub text: String,
    #[serde(default)]
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Best human-readable rendering of the thrown value.
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

/// `Input.dispatchKeyEvent` - one half of a key press.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEvent<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub key: &'a str,
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
    pub windows_virtual_key_code: u32,
    pub native_virtual_key_code: u32,
}

impl DispatchKeyEvent<'_> {
    pub const METHOD: &'static str = "Input.dispatchKeyEvent";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_serializes_camel_case() {
        let params = serde_json::to_value(Evaluate {
            expression: "1 + 1",
            return_by_value: true,
            await_promise: false,
        })
        .unwrap();
        assert_eq!(params["returnByValue"], true);
        assert_eq!(params["awaitPromise"], false);
    }

    #[test]
    fn evaluate_result_extracts_value() {
        let raw = r#"{"result":{"type":"number","value":2,"description":"2"}}"#;
        let parsed: EvaluateResult = serde_json::from_str(raw).unwrap();
        assert!(parsed.exception_details.is_none());
        assert_eq!(parsed.result.value.unwrap(), 2);
    }

    #[test]
    fn exception_details_prefer_thrown_description() {
        let raw = r#"{"text":"Uncaught","exception":{"type":"object","description":"Error: boom"}}"#;
        let details: ExceptionDetails = serde_json::from_str(raw).unwrap();
        assert_eq!(details.message(), "Error: boom");
    }

    #[test]
    fn key_event_uses_type_on_the_wire() {
        let params = serde_json::to_value(DispatchKeyEvent {
            kind: "keyDown",
            key: "Enter",
            code: "Enter",
            text: Some("\r"),
            windows_virtual_key_code: 13,
            native_virtual_key_code: 13,
        })
        .unwrap();
        assert_eq!(params["type"], "keyDown");
        assert_eq!(params["windowsVirtualKeyCode"], 13);
    }
}
