//! The states a connection passes through, exposed read-only so a caller
//! can observe the engine without polling frames.

/// Current phase of one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt is in flight; either not yet started, waiting
    /// out a reconnect delay, or permanently stopped.
    Disconnected,
    /// Opening the raw TCP (and, for `wss`, TLS) socket.
    ConnectingHttp,
    /// Socket open; performing the WebSocket upgrade handshake.
    ConnectingWs,
    /// Upgrade complete; frames are flowing.
    Connected,
    /// The transport could not be opened and the engine has stopped
    /// retrying. See [`EngineHandle::failure`](crate::EngineHandle::failure)
    /// for the underlying error.
    Failed,
}
