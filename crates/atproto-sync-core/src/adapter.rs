//! The engine/adapter contract.
//!
//! A [`StreamAdapter`] knows nothing about sockets. It is handed frames and
//! lifecycle notifications by the engine and answers with what to do next;
//! the engine owns the state machine, timeouts, and reconnect policy.

use async_trait::async_trait;
use tokio::sync::OwnedSemaphorePermit;

use crate::error::InitResult;
use crate::frame::{DisconnectReason, Frame};
use crate::outbound::OutboundSender;

/// What an adapter decided after looking at one inbound frame.
///
/// All three variants carry the adapter's user data back out, since even a
/// dropped or errored frame may have caused the adapter to update its own
/// bookkeeping (e.g. Tap still wants to nack before moving on).
#[derive(Debug)]
pub enum FrameOutcome<U> {
    /// The frame was handled normally.
    Ok(U),
    /// The frame was recognized and intentionally ignored (e.g. a Jetstream
    /// keepalive). Distinguished from `Ok` only for logging granularity.
    Noop(U),
    /// The frame failed to decode or violated a protocol invariant. Logged
    /// and dropped; the connection is not torn down.
    Error(String, U),
}

/// The hook set a connection engine drives a stream protocol through.
///
/// Implementors are the three protocol adapters (Firehose, Jetstream, Tap).
/// `UserData` is adapter-owned state threaded through the whole connection
/// lifetime (cursor position, pending ack ids, ...); the engine never
/// inspects it.
#[async_trait]
pub trait StreamAdapter: Send + Sync + 'static {
    /// Adapter-owned state threaded through `build_path`/`on_connected`/
    /// `on_disconnected`/`handle_frame` for the life of one connection.
    type UserData: Send + 'static;

    /// Validates adapter configuration and produces the adapter's initial
    /// state. Called once before the engine's first connection attempt.
    /// A fatal, caller-visible failure here aborts the whole stream.
    async fn init(&self) -> InitResult<Self::UserData>;

    /// Builds the request path (and query string) for the WebSocket upgrade,
    /// given the current state. Called again on every reconnect, so a
    /// cursor advanced since the last connection is picked up automatically.
    fn build_path(&self, user_data: &Self::UserData) -> String;

    /// Extra headers to send with the WebSocket upgrade request (e.g. a Tap
    /// instance's HTTP Basic credential). Called alongside `build_path` on
    /// every (re)connect attempt.
    fn extra_headers(&self, user_data: &Self::UserData) -> Vec<(String, String)> {
        let _ = user_data;
        Vec::new()
    }

    /// Called once the WebSocket upgrade completes. `outbound` is the
    /// adapter's send handle for this connection; implementations that push
    /// unsolicited frames (Jetstream `options_update`, Tap acks) stash a
    /// clone of it.
    async fn on_connected(&self, user_data: Self::UserData, outbound: OutboundSender) -> Self::UserData {
        let _ = &outbound;
        user_data
    }

    /// Called whenever the connection ends, successfully or not, before the
    /// engine decides whether to reconnect.
    async fn on_disconnected(&self, reason: DisconnectReason, user_data: Self::UserData) -> Self::UserData {
        let _ = reason;
        user_data
    }

    /// Handles one inbound frame. This is the only hook invoked from the
    /// engine's hot ingress loop; it should return quickly.
    ///
    /// `permit` is the flow-credit unit the engine acquired before reading
    /// this frame. An implementation that dispatches an event to a user
    /// callback must hand `permit` to [`crate::dispatch::spawn_dispatch`] so
    /// it is held until the callback completes; an implementation that drops
    /// the frame (decode failure, keepalive, protocol violation) should just
    /// let `permit` drop, returning the credit immediately.
    async fn handle_frame(
        &self,
        frame: Frame,
        permit: OwnedSemaphorePermit,
        user_data: Self::UserData,
    ) -> FrameOutcome<Self::UserData>;
}
