//! WebSocket transport for the DevTools connection.
//!
//! The transport pumps raw text frames between the WebSocket and a pair of
//! unbounded channels. Serialization and correlation live one layer up in
//! [`crate::connection::Connection`]; keeping the transport frame-oriented
//! lets connection tests drive it with plain channels.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Channel halves produced by [`Transport::connect`].
///
/// `sender` queues outbound frames for the writer pump; `receiver` yields
/// inbound text frames from the reader pump. Both pumps stop when their
/// peer channel or the socket closes.
pub struct TransportParts {
    /// Outbound frames, serialized by the caller.
    pub sender: mpsc::UnboundedSender<String>,
    /// Inbound text frames, one protocol message each.
    pub receiver: mpsc::UnboundedReceiver<String>,
}

/// Connector for the DevTools WebSocket.
pub struct Transport;

impl Transport {
    /// Connect to the given `ws://` endpoint and spawn the frame pumps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionFailed`] if the WebSocket handshake fails.
    pub async fn connect(url: &str) -> Result<TransportParts> {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| Error::ConnectionFailed(e.to_string()))?;

        debug!(target = "peso", url, "transport connected");

        let (mut sink, mut source) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(e) = sink.send(WsMessage::Text(frame)).await {
                    error!(target = "peso", error = %e, "transport write error");
                    break;
                }
            }
        });

        tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(WsMessage::Text(frame)) => {
                        if inbound_tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Ok(WsMessage::Close(_)) => {
                        debug!(target = "peso", "transport closed by peer");
                        break;
                    }
                    // Pings are answered by tungstenite; other frame kinds
                    // carry nothing the protocol layer needs.
                    Ok(_) => {}
                    Err(e) => {
                        error!(target = "peso", error = %e, "transport read error");
                        break;
                    }
                }
            }
        });

        Ok(TransportParts {
            sender: outbound_tx,
            receiver: inbound_rx,
        })
    }
}
