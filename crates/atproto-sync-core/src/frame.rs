//! Frame variants delivered from the connection engine to an adapter.
//!
//! The engine performs no payload parsing — it only demultiplexes the
//! WebSocket's native message kinds. Everything else is the adapter's job.

/// A single inbound WebSocket frame, handed to
/// [`crate::StreamAdapter::handle_frame`] untouched.
#[derive(Debug, Clone)]
pub enum Frame {
    /// A binary frame (Firehose events, zstd-compressed Jetstream events).
    Binary(Vec<u8>),
    /// A text frame (Jetstream's fallback path, all of Tap's ingress).
    Text(String),
    /// The peer closed the connection with no code or reason.
    Close,
    /// The peer closed the connection with a close code and reason string.
    CloseWithCode(u16, String),
}

/// Why [`crate::StreamAdapter::on_disconnected`] was invoked.
///
/// Distinguishing these lets an adapter log a connect-timeout differently
/// from a remote close without the engine having to special-case adapters.
#[derive(Debug, Clone)]
pub enum DisconnectReason {
    /// `connect_timeout` expired while opening the TCP/TLS socket.
    ConnectTimeout,
    /// `upgrade_timeout` expired while waiting for the WebSocket handshake.
    UpgradeTimeout,
    /// The WebSocket upgrade request received a non-101 response.
    UpgradeRejected {
        /// The HTTP status code the server returned.
        status: u16,
    },
    /// The peer closed the WebSocket (with or without a code/reason).
    RemoteClose {
        /// Close code, if the peer sent one.
        code: Option<u16>,
        /// Close reason, if the peer sent one.
        reason: Option<String>,
    },
    /// The underlying transport dropped unexpectedly (read/write error).
    TransportError {
        /// A human-readable description of the transport failure.
        message: String,
    },
    /// The stream instance was stopped by the caller; no reconnect follows.
    Stopped,
}
