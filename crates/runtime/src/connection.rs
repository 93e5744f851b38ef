//! Command/response correlation layer for the DevTools connection.
//!
//! This module sits on top of the transport and handles:
//! - Generating unique command IDs
//! - Correlating responses with pending commands
//! - Distinguishing events from responses
//! - Broadcasting events to subscribers
//!
//! # Message Flow
//!
//! 1. Client calls [`Connection::send`] with method, session, and params
//! 2. Connection allocates an ID and creates a oneshot channel
//! 3. Command is serialized and queued on the transport
//! 4. Client awaits on the oneshot receiver
//! 5. Dispatch loop receives the response frame from the transport
//! 6. Response is correlated by ID and delivered via the oneshot channel

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use peso_protocol::{Command, Event, Message, Response};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex as TokioMutex, broadcast, mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::transport::TransportParts;

/// Pending command callbacks keyed by command ID.
type CallbackMap = Arc<TokioMutex<HashMap<u32, oneshot::Sender<Result<Value>>>>>;

/// Capacity of the event broadcast channel; a lagging subscriber loses the
/// oldest events rather than stalling the dispatch loop.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// RAII guard ensuring callback cleanup when a command future is dropped.
struct CancelGuard {
    id: u32,
    callbacks: CallbackMap,
    completed: bool,
}

impl CancelGuard {
    fn new(id: u32, callbacks: CallbackMap) -> Self {
        Self {
            id,
            callbacks,
            completed: false,
        }
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if self.completed {
            return;
        }

        let id = self.id;
        let callbacks = Arc::clone(&self.callbacks);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if callbacks.lock().await.remove(&id).is_some() {
                    debug!(target = "peso", id, "removed orphaned callback");
                }
            });
        }
    }
}

/// DevTools connection with command correlation and event broadcast.
///
/// Uses sequential command IDs and oneshot channels for correlation. Events
/// fan out over a broadcast channel so page-level trackers (e.g. network
/// idle) can observe them without coupling to the dispatch loop.
pub struct Connection {
    /// Sequential command ID counter (atomic for thread safety).
    last_id: AtomicU32,
    /// Pending command callbacks keyed by command ID.
    callbacks: CallbackMap,
    /// Channel for queueing outbound frames on the transport writer.
    outbound_tx: mpsc::UnboundedSender<String>,
    /// Event fan-out to subscribers.
    events_tx: broadcast::Sender<Event>,
}

impl Connection {
    /// Create a connection over the given transport and start its dispatch
    /// loop.
    pub fn new(parts: TransportParts) -> Arc<Self> {
        let TransportParts {
            sender,
            mut receiver,
        } = parts;

        let callbacks: CallbackMap = Arc::new(TokioMutex::new(HashMap::new()));
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let connection = Arc::new(Self {
            last_id: AtomicU32::new(0),
            callbacks: Arc::clone(&callbacks),
            outbound_tx: sender,
            events_tx: events_tx.clone(),
        });

        tokio::spawn(async move {
            while let Some(frame) = receiver.recv().await {
                match serde_json::from_str::<Message>(&frame) {
                    Ok(Message::Response(response)) => {
                        deliver_response(&callbacks, response).await;
                    }
                    Ok(Message::Event(event)) => {
                        // No subscribers is fine; events are advisory.
                        let _ = events_tx.send(event);
                    }
                    Ok(Message::Unknown(value)) => {
                        warn!(target = "peso", %value, "unknown protocol frame");
                    }
                    Err(e) => {
                        error!(target = "peso", error = %e, "failed to parse protocol frame");
                    }
                }
            }

            // Transport is gone; fail every command still in flight.
            for (_, tx) in callbacks.lock().await.drain() {
                let _ = tx.send(Err(Error::ChannelClosed));
            }
        });

        connection
    }

    /// Send a command and await its response.
    ///
    /// `session_id` addresses an attached target; `None` sends a
    /// browser-level command.
    pub async fn send(
        &self,
        method: &str,
        session_id: Option<&str>,
        params: Value,
    ) -> Result<Value> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;

        debug!(target = "peso", id, method, "sending command");

        let (tx, rx) = oneshot::channel();
        self.callbacks.lock().await.insert(id, tx);
        let mut guard = CancelGuard::new(id, Arc::clone(&self.callbacks));

        let command = Command {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };

        let frame = serde_json::to_string(&command)?;
        if self.outbound_tx.send(frame).is_err() {
            self.callbacks.lock().await.remove(&id);
            guard.complete();
            return Err(Error::ChannelClosed);
        }

        let result = rx
            .await
            .map_err(|_| Error::ChannelClosed)
            .and_then(|r| r);
        guard.complete();
        result
    }

    /// Send a command with typed parameters.
    pub async fn call<P: Serialize>(
        &self,
        method: &str,
        session_id: Option<&str>,
        params: &P,
    ) -> Result<Value> {
        self.send(method, session_id, serde_json::to_value(params)?)
            .await
    }

    /// Subscribe to the protocol event stream.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }
}

/// Correlate one response with its pending command.
async fn deliver_response(callbacks: &CallbackMap, response: Response) {
    let Some(tx) = callbacks.lock().await.remove(&response.id) else {
        warn!(target = "peso", id = response.id, "response without pending command");
        return;
    };

    let outcome = match response.error {
        Some(err) => Err(Error::Cdp {
            code: err.code,
            message: err.message,
        }),
        None => Ok(response.result.unwrap_or(Value::Null)),
    };

    // Receiver may have been dropped by a timed-out caller.
    let _ = tx.send(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

    /// Transport stand-in driven directly through channels.
    fn test_connection() -> (Arc<Connection>, UnboundedReceiver<String>, UnboundedSender<String>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let connection = Connection::new(TransportParts {
            sender: outbound_tx,
            receiver: inbound_rx,
        });
        (connection, outbound_rx, inbound_tx)
    }

    #[tokio::test]
    async fn response_is_correlated_by_id() {
        let (connection, mut outbound, inbound) = test_connection();

        let echo = tokio::spawn(async move {
            let frame = outbound.recv().await.unwrap();
            let command: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(command["method"], "Browser.getVersion");
            let reply = json!({ "id": command["id"], "result": { "product": "Chrome/131" } });
            inbound.send(reply.to_string()).unwrap();
        });

        let result = connection
            .send("Browser.getVersion", None, Value::Null)
            .await
            .unwrap();
        assert_eq!(result["product"], "Chrome/131");
        echo.await.unwrap();
    }

    #[tokio::test]
    async fn remote_error_maps_to_cdp_variant() {
        let (connection, mut outbound, inbound) = test_connection();

        tokio::spawn(async move {
            let frame = outbound.recv().await.unwrap();
            let command: Value = serde_json::from_str(&frame).unwrap();
            let reply = json!({
                "id": command["id"],
                "error": { "code": -32000, "message": "Cannot find context with specified id" }
            });
            inbound.send(reply.to_string()).unwrap();
        });

        match connection.send("Runtime.evaluate", None, json!({})).await {
            Err(Error::Cdp { code, message }) => {
                assert_eq!(code, -32000);
                assert!(message.contains("Cannot find context"));
            }
            other => panic!("expected Cdp error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn events_reach_subscribers() {
        let (connection, _outbound, inbound) = test_connection();
        let mut events = connection.events();

        inbound
            .send(
                json!({
                    "method": "Network.requestWillBeSent",
                    "params": { "requestId": "1" },
                    "sessionId": "S1"
                })
                .to_string(),
            )
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(event.method, "Network.requestWillBeSent");
        assert_eq!(event.session_id.as_deref(), Some("S1"));
    }

    #[tokio::test]
    async fn closed_transport_fails_pending_commands() {
        let (connection, outbound, inbound) = test_connection();

        let pending = tokio::spawn({
            let connection = Arc::clone(&connection);
            async move { connection.send("Page.navigate", None, json!({})).await }
        });

        // Give the command time to register, then tear the transport down.
        tokio::task::yield_now().await;
        drop(inbound);
        drop(outbound);

        match pending.await.unwrap() {
            Err(Error::ChannelClosed) => {}
            other => panic!("expected ChannelClosed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn session_id_is_forwarded_on_the_wire() {
        let (connection, mut outbound, inbound) = test_connection();

        tokio::spawn(async move {
            let frame = outbound.recv().await.unwrap();
            let command: Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(command["sessionId"], "S9");
            let reply = json!({ "id": command["id"], "result": {} });
            inbound.send(reply.to_string()).unwrap();
        });

        connection
            .send("Page.enable", Some("S9"), Value::Null)
            .await
            .unwrap();
    }
}
