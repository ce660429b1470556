//! The engine's send path: how an adapter pushes frames back out over the
//! same WebSocket it is receiving on (Jetstream options updates, Tap acks).

use thiserror::Error;
use tokio::sync::mpsc;

/// An outbound frame queued for the engine's write side.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    /// A text frame (Jetstream `options_update`, Tap `ack`).
    Text(String),
    /// A binary frame. No adapter currently sends these, but the engine
    /// doesn't care what it forwards.
    Binary(Vec<u8>),
}

/// Raised when a send is attempted after the connection that owned the
/// channel has gone away.
#[derive(Debug, Error)]
#[error("outbound channel closed: the connection has been torn down")]
pub struct SendError;

/// A cheaply-cloneable handle an adapter stashes at `on_connected` time and
/// uses afterwards — from inside `handle_frame`, from a dispatcher task, or
/// from an adapter method called directly by application code (e.g.
/// `update_options`) — to push a frame out on the current connection.
///
/// Sends issued against a stale handle (the connection it was made for has
/// since been replaced by a reconnect) fail with [`SendError`] rather than
/// silently going to the wrong socket.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    tx: mpsc::Sender<OutboundFrame>,
}

impl OutboundSender {
    /// Wraps a raw channel sender. Constructed by the engine only.
    pub fn new(tx: mpsc::Sender<OutboundFrame>) -> Self {
        Self { tx }
    }

    /// Queues a text frame for the engine to send.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.tx.send(OutboundFrame::Text(text.into())).await.map_err(|_| SendError)
    }

    /// Queues a binary frame for the engine to send.
    pub async fn send_binary(&self, data: impl Into<Vec<u8>>) -> Result<(), SendError> {
        self.tx.send(OutboundFrame::Binary(data.into())).await.map_err(|_| SendError)
    }
}
