//! The Jetstream [`StreamAdapter`] implementation.

use std::sync::Arc;

use async_trait::async_trait;
use atproto_sync_core::{
    spawn_dispatch, DisconnectReason, Frame, FrameOutcome, InitResult, OutboundSender, SendError, StreamAdapter,
};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, warn};

use crate::config::JetstreamConfig;
use crate::event::{build_event, Event};
use crate::path::{build_path, FilterState};
use crate::wire::EventWire;

/// A user callback invoked once per decoded event.
pub type EventHandler = Arc<dyn Fn(Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// State threaded through one Jetstream connection's lifetime.
#[derive(Debug, Clone, Default)]
pub struct JetstreamState {
    last_time_us: Option<i64>,
}

struct Inner {
    filter: Mutex<FilterState>,
    outbound: Mutex<Option<OutboundSender>>,
    handler: EventHandler,
}

/// Connects to `/subscribe` and dispatches decoded repo events.
///
/// Cheaply cloneable: a clone shares the same filter and outbound-sender
/// state, which is how [`JetstreamAdapter::update_options`] reaches the
/// live connection from outside the engine's ownership of the adapter.
#[derive(Clone)]
pub struct JetstreamAdapter(Arc<Inner>);

impl JetstreamAdapter {
    pub fn new(config: JetstreamConfig, handler: EventHandler) -> Self {
        let filter = FilterState {
            wanted_collections: config.initial_collections(),
            wanted_dids: config.initial_dids(),
            cursor: config.starting_cursor(),
            require_hello: config.require_hello_flag(),
            max_message_size_bytes: config.max_message_size(),
        };
        Self(Arc::new(Inner { filter: Mutex::new(filter), outbound: Mutex::new(None), handler }))
    }

    /// Sends an `options_update` control frame over the live connection,
    /// updating only the fields provided. An empty `Vec` clears that filter.
    /// Fails if there is no connection currently established.
    pub async fn update_options(
        &self,
        wanted_collections: Option<Vec<String>>,
        wanted_dids: Option<Vec<String>>,
        max_message_size_bytes: Option<u64>,
    ) -> Result<(), SendError> {
        let mut payload = serde_json::Map::new();
        {
            let mut filter = self.0.filter.lock();
            if let Some(collections) = wanted_collections {
                payload.insert("wantedCollections".to_string(), serde_json::json!(collections));
                filter.wanted_collections = collections;
            }
            if let Some(dids) = wanted_dids {
                payload.insert("wantedDids".to_string(), serde_json::json!(dids));
                filter.wanted_dids = dids;
            }
            if let Some(max) = max_message_size_bytes {
                payload.insert("maxMessageSizeBytes".to_string(), serde_json::json!(max));
                filter.max_message_size_bytes = Some(max);
            }
        }

        let frame = serde_json::json!({ "type": "options_update", "payload": payload });
        let outbound = self.0.outbound.lock().clone();
        match outbound {
            Some(outbound) => outbound.send_text(frame.to_string()).await,
            None => Err(SendError),
        }
    }
}

#[async_trait]
impl StreamAdapter for JetstreamAdapter {
    type UserData = JetstreamState;

    async fn init(&self) -> InitResult<Self::UserData> {
        Ok(JetstreamState { last_time_us: self.0.filter.lock().cursor })
    }

    fn build_path(&self, user_data: &Self::UserData) -> String {
        let mut state = self.0.filter.lock().clone();
        if let Some(time_us) = user_data.last_time_us {
            state.cursor = Some(time_us);
        }
        build_path(&state)
    }

    async fn on_connected(&self, user_data: Self::UserData, outbound: OutboundSender) -> Self::UserData {
        *self.0.outbound.lock() = Some(outbound);
        user_data
    }

    async fn on_disconnected(&self, reason: DisconnectReason, user_data: Self::UserData) -> Self::UserData {
        *self.0.outbound.lock() = None;
        debug!(?reason, last_time_us = ?user_data.last_time_us, "jetstream connection ended");
        user_data
    }

    async fn handle_frame(
        &self,
        frame: Frame,
        permit: OwnedSemaphorePermit,
        mut user_data: Self::UserData,
    ) -> FrameOutcome<Self::UserData> {
        let json = match frame {
            Frame::Binary(bytes) => match atproto_sync_codecs::zstd_decompress(&bytes) {
                Ok(decompressed) => decompressed,
                Err(err) => {
                    drop(permit);
                    return FrameOutcome::Error(err.to_string(), user_data);
                }
            },
            Frame::Text(text) => text.into_bytes(),
            Frame::Close | Frame::CloseWithCode(..) => {
                drop(permit);
                return FrameOutcome::Noop(user_data);
            }
        };

        if let Some(max) = self.0.filter.lock().max_message_size_bytes {
            if json.len() as u64 > max {
                drop(permit);
                return FrameOutcome::Error(format!("ingress message of {} bytes exceeds configured cap", json.len()), user_data);
            }
        }

        let wire: EventWire = match serde_json::from_slice(&json) {
            Ok(wire) => wire,
            Err(err) => {
                drop(permit);
                return FrameOutcome::Error(err.to_string(), user_data);
            }
        };

        let time_us = wire.time_us;
        let kind = wire.kind.clone();
        let Some(event) = build_event(wire) else {
            warn!(kind = %kind, "jetstream event missing its kind-tagged payload");
            drop(permit);
            return FrameOutcome::Noop(user_data);
        };

        user_data.last_time_us = Some(time_us);

        let handler = self.0.handler.clone();
        spawn_dispatch(permit, async move { handler(event).await });
        FrameOutcome::Ok(user_data)
    }
}
