//! The connection-engine state machine.
//!
//! This crate knows nothing about Firehose/Jetstream/Tap wire formats — it
//! drives any [`StreamAdapter`] through connect, upgrade, ingress, and
//! reconnect, the way `alloy-transport`'s WebSocket client drives a
//! `ConnectionHandler`. The states in [`ConnectionState`] are exactly what
//! [`start`] cycles an adapter through: `Disconnected` while idle or backing
//! off, `ConnectingHttp` while the raw TCP/TLS socket is opening,
//! `ConnectingWs` while the upgrade handshake is in flight, `Connected` once
//! frames are flowing, and `Failed` if the transport never opens at all
//! (see [`EngineHandle::failure`]).

mod handle;
mod run;
mod state;
mod tls_connector;

use std::sync::Arc;

use atproto_sync_core::{EngineConfig, InitResult, StreamAdapter};
use tokio::sync::watch;

pub use handle::EngineHandle;
pub use state::ConnectionState;

/// Starts the connection engine for `adapter` against `config`.
///
/// Calls [`StreamAdapter::init`] synchronously (so a misconfiguration is
/// reported to the caller immediately) and then spawns the connect/ingress/
/// reconnect loop as a background task. The returned handle controls that
/// task; dropping it has no effect on the running loop.
pub async fn start<A>(adapter: A, config: EngineConfig) -> InitResult<EngineHandle>
where
    A: StreamAdapter,
{
    let adapter = Arc::new(adapter);
    let user_data = adapter.init().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
    let (failure_tx, failure_rx) = watch::channel(None);

    tokio::spawn(run::run(adapter, config, user_data, shutdown_rx, state_tx, failure_tx));

    Ok(EngineHandle::new(shutdown_tx, state_rx, failure_rx))
}
