//! Firehose stream adapter for `com.atproto.sync.subscribeRepos`.
//!
//! Firehose frames are pairs of DagCBOR items (a small header, then a
//! payload whose shape depends on the header's `t` tag) wrapping a CAR
//! archive of repo blocks on commit events. This crate decodes both layers
//! and hands the engine's connection-state machine a [`FirehoseAdapter`]
//! that tracks the monotonic `seq` cursor needed to resume after a
//! reconnect.

mod adapter;
mod config;
mod event;
mod seq;
mod wire;

use atproto_sync_core::InitResult;
use atproto_sync_engine::EngineHandle;

pub use adapter::{EventHandler, FirehoseAdapter, FirehoseState};
pub use config::FirehoseConfig;
pub use event::{Account, AccountStatus, Commit, Event, Identity, Info, RepoOp, RepoOpAction, Sync};
pub use seq::valid_seq;

/// Starts a Firehose stream, calling `handler` for each decoded event.
pub async fn start(config: FirehoseConfig, handler: EventHandler) -> InitResult<EngineHandle> {
    let engine_config = config.to_engine_config();
    let adapter = FirehoseAdapter::new(config, handler);
    atproto_sync_engine::start(adapter, engine_config).await
}
