//! Chromium-backed page over the DevTools protocol.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use peso_protocol::{
    AttachToTarget, AttachToTargetResult, CloseTarget, CreateTarget, CreateTargetResult,
    DispatchKeyEvent, Evaluate, EvaluateResult, Navigate,
};
use peso_runtime::{BrowserProcess, Connection, Error, LaunchConfig, Result, Transport};
use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::js;
use crate::driver::PageDriver;

/// Upper bound for a single protocol command round trip.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// The page counts as idle once no request has been in flight for this long.
const IDLE_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Poll interval for the idle condition.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Network activity bookkeeping fed by protocol events.
#[derive(Debug)]
struct NetworkTracker {
    inflight: HashSet<String>,
    last_change: Instant,
}

impl NetworkTracker {
    fn new() -> Self {
        Self {
            inflight: HashSet::new(),
            last_change: Instant::now(),
        }
    }

    fn request_started(&mut self, request_id: &str) {
        self.inflight.insert(request_id.to_string());
        self.last_change = Instant::now();
    }

    fn request_ended(&mut self, request_id: &str) {
        self.inflight.remove(request_id);
        self.last_change = Instant::now();
    }

    /// Lost events leave `inflight` unreliable; start over from empty.
    fn reset(&mut self) {
        self.inflight.clear();
        self.last_change = Instant::now();
    }

    fn idle_since(&self) -> Option<Instant> {
        self.inflight.is_empty().then_some(self.last_change)
    }
}

/// One Chromium page attached in flat session mode.
///
/// Owns the browser process it runs in; [`PageDriver::close`] tears the
/// whole stack down (target, connection, process).
pub struct CdpPage {
    connection: Arc<Connection>,
    session_id: String,
    target_id: String,
    tracker: Arc<Mutex<NetworkTracker>>,
    process: TokioMutex<Option<BrowserProcess>>,
}

/// Send one command with the round-trip bound applied.
async fn call(
    connection: &Connection,
    method: &str,
    session_id: Option<&str>,
    params: Value,
) -> Result<Value> {
    tokio::time::timeout(COMMAND_TIMEOUT, connection.send(method, session_id, params))
        .await
        .map_err(|_| {
            Error::Timeout(format!(
                "{method} did not respond within {}s",
                COMMAND_TIMEOUT.as_secs()
            ))
        })?
}

impl CdpPage {
    /// Launch a browser, attach to a fresh page target, and enable the
    /// Page/Runtime/Network domains.
    pub(crate) async fn open(config: &LaunchConfig) -> Result<Self> {
        let process = BrowserProcess::launch(config).await?;
        let parts = Transport::connect(process.ws_endpoint()).await?;
        let connection = Connection::new(parts);

        let created: CreateTargetResult = serde_json::from_value(
            call(
                &connection,
                CreateTarget::METHOD,
                None,
                serde_json::to_value(CreateTarget { url: "about:blank" })?,
            )
            .await?,
        )?;

        let attached: AttachToTargetResult = serde_json::from_value(
            call(
                &connection,
                AttachToTarget::METHOD,
                None,
                serde_json::to_value(AttachToTarget {
                    target_id: &created.target_id,
                    flatten: true,
                })?,
            )
            .await?,
        )?;
        let session_id = attached.session_id;

        for method in ["Page.enable", "Runtime.enable", "Network.enable"] {
            call(&connection, method, Some(&session_id), Value::Null).await?;
        }

        let tracker = Arc::new(Mutex::new(NetworkTracker::new()));
        spawn_network_tracker(&connection, session_id.clone(), Arc::clone(&tracker));

        debug!(target = "peso", session_id = %session_id, "page attached");

        Ok(Self {
            connection,
            session_id,
            target_id: created.target_id,
            tracker,
            process: TokioMutex::new(Some(process)),
        })
    }

    /// Send a session-scoped command.
    async fn command(&self, method: &str, params: Value) -> Result<Value> {
        call(&self.connection, method, Some(&self.session_id), params).await
    }

    /// Evaluate an expression in the page and return its by-value result.
    async fn evaluate(&self, expression: &str) -> Result<Value> {
        let raw = self
            .command(
                Evaluate::METHOD,
                serde_json::to_value(Evaluate {
                    expression,
                    return_by_value: true,
                    await_promise: false,
                })?,
            )
            .await?;
        let parsed: EvaluateResult = serde_json::from_value(raw)?;
        if let Some(details) = parsed.exception_details {
            return Err(Error::Evaluation(details.message()));
        }
        Ok(parsed.result.value.unwrap_or(Value::Null))
    }

    /// Evaluate a snippet whose `false` result means the element is absent.
    async fn evaluate_element_op(&self, expression: &str, what: &str) -> Result<()> {
        match self.evaluate(expression).await? {
            Value::Bool(true) => Ok(()),
            _ => Err(Error::ElementNotFound(what.to_string())),
        }
    }
}

/// Keep the tracker in sync with the session's network events.
fn spawn_network_tracker(
    connection: &Connection,
    session_id: String,
    tracker: Arc<Mutex<NetworkTracker>>,
) {
    let mut events = connection.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if event.session_id.as_deref() != Some(session_id.as_str()) {
                        continue;
                    }
                    let Some(request_id) = event.params["requestId"].as_str() else {
                        continue;
                    };
                    let mut tracker = tracker.lock().expect("network tracker poisoned");
                    match event.method.as_str() {
                        "Network.requestWillBeSent" => tracker.request_started(request_id),
                        "Network.loadingFinished" | "Network.loadingFailed" => {
                            tracker.request_ended(request_id);
                        }
                        _ => {}
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(target = "peso", missed, "network events lagged; resetting tracker");
                    tracker.lock().expect("network tracker poisoned").reset();
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> Result<()> {
        let result = self
            .command(Navigate::METHOD, serde_json::to_value(Navigate { url })?)
            .await?;
        if let Some(error_text) = result["errorText"].as_str() {
            if !error_text.is_empty() {
                return Err(Error::ProtocolError(format!(
                    "navigation to {url} failed: {error_text}"
                )));
            }
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.evaluate_element_op(&js::fill_js(selector, value), selector)
            .await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.evaluate_element_op(&js::click_js(selector), selector)
            .await
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        self.evaluate_element_op(
            &js::click_nth_js(selector, index),
            &format!("{selector} (index {index})"),
        )
        .await
    }

    async fn click_text(&self, text: &str) -> Result<()> {
        self.evaluate_element_op(&js::click_text_js(text), &format!("text={text}"))
            .await
    }

    async fn hover_text(&self, text: &str) -> Result<()> {
        self.evaluate_element_op(&js::hover_text_js(text), &format!("text={text}"))
            .await
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.evaluate_element_op(&js::select_option_js(selector, value), selector)
            .await
    }

    async fn press(&self, key: &str) -> Result<()> {
        // Only the keys the catalog flow needs; Enter must carry the CR text
        // for the search form to submit.
        let (code, text, virtual_key) = match key {
            "Enter" => ("Enter", Some("\r"), 13u32),
            "Tab" => ("Tab", None, 9),
            other => (other, None, 0),
        };

        for kind in ["keyDown", "keyUp"] {
            self.command(
                DispatchKeyEvent::METHOD,
                serde_json::to_value(DispatchKeyEvent {
                    kind,
                    key,
                    code,
                    text: if kind == "keyDown" { text } else { None },
                    windows_virtual_key_code: virtual_key,
                    native_virtual_key_code: virtual_key,
                })?,
            )
            .await?;
        }
        Ok(())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let idle_since = self
                .tracker
                .lock()
                .expect("network tracker poisoned")
                .idle_since();
            if let Some(since) = idle_since {
                if since.elapsed() >= IDLE_QUIET_WINDOW {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(format!(
                    "network idle not reached within {}ms",
                    timeout.as_millis()
                )));
            }
            tokio::time::sleep(IDLE_POLL).await;
        }
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        match self.evaluate(&js::count_js(selector)).await? {
            Value::Number(n) => Ok(n.as_u64().unwrap_or(0) as usize),
            other => Err(Error::ProtocolError(format!(
                "element count returned {other} instead of a number"
            ))),
        }
    }

    async fn inner_text(&self, selector: &str, index: usize) -> Result<String> {
        match self.evaluate(&js::inner_text_js(selector, index)).await? {
            Value::String(text) => Ok(text),
            Value::Null => Err(Error::ElementNotFound(format!(
                "{selector} (index {index})"
            ))),
            other => Err(Error::ProtocolError(format!(
                "innerText returned {other} instead of a string"
            ))),
        }
    }

    async fn close(&self) -> Result<()> {
        let Some(process) = self.process.lock().await.take() else {
            return Ok(());
        };

        // Best effort; the process teardown below closes the target anyway.
        if let Err(e) = call(
            &self.connection,
            CloseTarget::METHOD,
            None,
            serde_json::to_value(CloseTarget {
                target_id: &self.target_id,
            })?,
        )
        .await
        {
            debug!(target = "peso", error = %e, "closeTarget failed before shutdown");
        }

        process.shutdown().await
    }
}
