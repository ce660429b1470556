//! The Tap [`StreamAdapter`] implementation.

use std::sync::Arc;

use async_trait::async_trait;
use atproto_sync_core::{
    spawn_dispatch, DisconnectReason, Frame, FrameOutcome, InitResult, OutboundSender, StreamAdapter,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, warn};

use crate::config::TapConfig;
use crate::event::build_event;

/// A user callback invoked once per decoded event. The returned result
/// decides the ack: `Ok(())` acks, `Err(reason)` logs `reason` and skips the
/// ack (the server retries after its own timeout). A panicking callback is
/// caught by the dispatcher and treated the same as `Err`.
pub type EventHandler = Arc<dyn Fn(crate::event::Event) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Tap carries no cursor of its own; there is no per-connection state beyond
/// what the adapter already holds.
#[derive(Debug, Clone, Default)]
pub struct TapState;

/// Connects to `/channel` and dispatches decoded record/identity events,
/// acking each one after its handler returns.
pub struct TapAdapter {
    admin_password: Option<String>,
    disable_acks: bool,
    outbound: Mutex<Option<OutboundSender>>,
    handler: EventHandler,
}

impl TapAdapter {
    pub fn new(config: &TapConfig, handler: EventHandler) -> Self {
        Self {
            admin_password: config.admin_password_ref().map(str::to_string),
            disable_acks: config.acks_disabled(),
            outbound: Mutex::new(None),
            handler,
        }
    }
}

#[async_trait]
impl StreamAdapter for TapAdapter {
    type UserData = TapState;

    async fn init(&self) -> InitResult<Self::UserData> {
        Ok(TapState)
    }

    fn build_path(&self, _user_data: &Self::UserData) -> String {
        "/channel".to_string()
    }

    fn extra_headers(&self, _user_data: &Self::UserData) -> Vec<(String, String)> {
        match &self.admin_password {
            Some(password) => {
                vec![("Authorization".to_string(), format!("Basic {}", BASE64.encode(format!("admin:{password}"))))]
            }
            None => Vec::new(),
        }
    }

    async fn on_connected(&self, user_data: Self::UserData, outbound: OutboundSender) -> Self::UserData {
        *self.outbound.lock() = Some(outbound);
        user_data
    }

    async fn on_disconnected(&self, reason: DisconnectReason, user_data: Self::UserData) -> Self::UserData {
        *self.outbound.lock() = None;
        debug!(?reason, "tap connection ended");
        user_data
    }

    async fn handle_frame(
        &self,
        frame: Frame,
        permit: OwnedSemaphorePermit,
        user_data: Self::UserData,
    ) -> FrameOutcome<Self::UserData> {
        let text = match frame {
            Frame::Text(text) => text,
            Frame::Binary(_) => {
                drop(permit);
                return FrameOutcome::Error("unexpected binary frame on tap".to_string(), user_data);
            }
            Frame::Close | Frame::CloseWithCode(..) => {
                drop(permit);
                return FrameOutcome::Noop(user_data);
            }
        };

        let wire = match serde_json::from_str(&text) {
            Ok(wire) => wire,
            Err(err) => {
                drop(permit);
                return FrameOutcome::Error(err.to_string(), user_data);
            }
        };

        let Some((id, event)) = build_event(wire) else {
            drop(permit);
            return FrameOutcome::Noop(user_data);
        };

        let handler = self.handler.clone();
        let disable_acks = self.disable_acks;
        let outbound = self.outbound.lock().clone();
        spawn_dispatch(permit, async move {
            let outcome = handler(event).await;
            if disable_acks {
                return;
            }
            match outcome {
                Ok(()) => {
                    if let Some(outbound) = outbound {
                        let ack = serde_json::json!({ "type": "ack", "id": id }).to_string();
                        if let Err(err) = outbound.send_text(ack).await {
                            warn!(error = %err, id, "failed to send tap ack");
                        }
                    }
                }
                Err(reason) => {
                    warn!(id, reason = %reason, "tap handler declined to ack event");
                }
            }
        });

        FrameOutcome::Ok(user_data)
    }
}
