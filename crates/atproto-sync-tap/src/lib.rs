//! Tap stream adapter: a JSON WebSocket with per-message acknowledgment
//! instead of a cursor, plus a companion HTTP admin client.
//!
//! Unlike Firehose and Jetstream, Tap tracks no client-side resume position
//! — the server retries an event until it's acked, so progress lives
//! entirely in which ids have been acked. [`TapAdapter::handle_frame`] acks
//! an event only after the user's handler future resolves successfully.

mod adapter;
mod admin;
mod config;
mod error;
mod event;
mod wire;

use atproto_sync_core::InitResult;
use atproto_sync_engine::EngineHandle;

pub use adapter::{EventHandler, TapAdapter, TapState};
pub use admin::TapAdminClient;
pub use config::TapConfig;
pub use error::AdminError;
pub use event::{Event, IdentityEvent, IdentityStatus, RecordEvent, RepoAction};

/// Starts a Tap stream, calling `handler` for each decoded event.
pub async fn start(config: TapConfig, handler: EventHandler) -> InitResult<EngineHandle> {
    let engine_config = config.to_engine_config();
    let adapter = TapAdapter::new(&config, handler);
    atproto_sync_engine::start(adapter, engine_config).await
}

/// Builds the companion HTTP admin client for `config`'s host and password.
pub fn admin_client(config: &TapConfig) -> TapAdminClient {
    TapAdminClient::new(config.host(), config.admin_password_ref())
}
