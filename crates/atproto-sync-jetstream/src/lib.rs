//! Jetstream stream adapter for Bluesky's filtered, zstd-compressed JSON
//! firehose mirror.
//!
//! Unlike Firehose, Jetstream lets a caller narrow the stream server-side
//! (by collection NSID and/or DID) and change that filter live via an
//! `options_update` control frame. [`JetstreamHandle`] exposes that as
//! [`JetstreamHandle::update_options`] alongside the usual connection
//! controls.

mod adapter;
mod config;
mod event;
mod path;
mod wire;

use atproto_sync_core::{InitResult, SendError};
use atproto_sync_engine::{ConnectionState, EngineHandle};
use tokio::sync::watch;

pub use adapter::{EventHandler, JetstreamAdapter, JetstreamState};
pub use config::JetstreamConfig;
pub use event::{Account, Commit, Event, Identity, RepoOperation};

/// Handle to a running Jetstream stream instance.
#[derive(Clone)]
pub struct JetstreamHandle {
    engine: EngineHandle,
    adapter: JetstreamAdapter,
}

impl JetstreamHandle {
    fn new(engine: EngineHandle, adapter: JetstreamAdapter) -> Self {
        Self { engine, adapter }
    }

    /// Signals the stream to stop.
    pub fn stop(&self) {
        self.engine.stop()
    }

    /// The stream's current connection state.
    pub fn state(&self) -> ConnectionState {
        self.engine.state()
    }

    /// A receiver that resolves each time the connection state changes.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.engine.state_changes()
    }

    /// Updates the server-side filter on the live connection. See
    /// [`JetstreamAdapter::update_options`].
    pub async fn update_options(
        &self,
        wanted_collections: Option<Vec<String>>,
        wanted_dids: Option<Vec<String>>,
        max_message_size_bytes: Option<u64>,
    ) -> Result<(), SendError> {
        self.adapter.update_options(wanted_collections, wanted_dids, max_message_size_bytes).await
    }
}

/// Starts a Jetstream stream, calling `handler` for each decoded event.
pub async fn start(config: JetstreamConfig, handler: EventHandler) -> InitResult<JetstreamHandle> {
    config.validate()?;
    let engine_config = config.to_engine_config();
    let adapter = JetstreamAdapter::new(config, handler);
    let handle_adapter = adapter.clone();
    let engine = atproto_sync_engine::start(adapter, engine_config).await?;
    Ok(JetstreamHandle::new(engine, handle_adapter))
}
