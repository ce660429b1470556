//! The Firehose [`StreamAdapter`] implementation.

use std::sync::Arc;

use async_trait::async_trait;
use atproto_sync_codecs::{decode_header, decode_payload};
use atproto_sync_core::{spawn_dispatch, DisconnectReason, Frame, FrameOutcome, InitResult, StreamAdapter};
use futures::future::BoxFuture;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{debug, warn};

use crate::config::FirehoseConfig;
use crate::event::{build_account, build_commit, build_identity, build_info, build_sync, Event};
use crate::seq::valid_seq;
use crate::wire::{AccountWire, CommitWire, ErrorWire, IdentityWire, InfoWire, SyncWire};

/// A user callback invoked once per decoded event.
///
/// `Arc`-wrapped so the adapter can clone it per dispatch without cloning
/// the closure itself.
pub type EventHandler = Arc<dyn Fn(Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// State threaded through one Firehose connection's lifetime: just the
/// highest accepted `seq`, since that's all `build_path` and `valid_seq`
/// need to resume correctly across a reconnect.
#[derive(Debug, Clone, Default)]
pub struct FirehoseState {
    last_seq: Option<i64>,
}

/// Connects to `com.atproto.sync.subscribeRepos` and dispatches decoded
/// repo events to a user-supplied callback.
pub struct FirehoseAdapter {
    config: FirehoseConfig,
    handler: EventHandler,
}

impl FirehoseAdapter {
    /// Creates an adapter that calls `handler` for each decoded event.
    pub fn new(config: FirehoseConfig, handler: EventHandler) -> Self {
        Self { config, handler }
    }
}

#[async_trait]
impl StreamAdapter for FirehoseAdapter {
    type UserData = FirehoseState;

    async fn init(&self) -> InitResult<Self::UserData> {
        Ok(FirehoseState { last_seq: self.config.starting_cursor() })
    }

    fn build_path(&self, user_data: &Self::UserData) -> String {
        match user_data.last_seq {
            Some(seq) => format!("/xrpc/com.atproto.sync.subscribeRepos?cursor={seq}"),
            None => "/xrpc/com.atproto.sync.subscribeRepos".to_string(),
        }
    }

    async fn on_disconnected(&self, reason: DisconnectReason, user_data: Self::UserData) -> Self::UserData {
        debug!(?reason, last_seq = ?user_data.last_seq, "firehose connection ended");
        user_data
    }

    async fn handle_frame(
        &self,
        frame: Frame,
        permit: OwnedSemaphorePermit,
        mut user_data: Self::UserData,
    ) -> FrameOutcome<Self::UserData> {
        let bytes = match frame {
            Frame::Binary(bytes) => bytes,
            Frame::Text(_) => {
                drop(permit);
                return FrameOutcome::Error("unexpected text frame on firehose".to_string(), user_data);
            }
            Frame::Close | Frame::CloseWithCode(..) => {
                drop(permit);
                return FrameOutcome::Noop(user_data);
            }
        };

        let (header, offset) = match decode_header(&bytes) {
            Ok(parsed) => parsed,
            Err(err) => {
                drop(permit);
                return FrameOutcome::Error(err.to_string(), user_data);
            }
        };
        let payload = &bytes[offset..];

        if header.op == -1 {
            drop(permit);
            let message = decode_payload::<ErrorWire>(payload)
                .map(|e| e.message.or(e.error).unwrap_or_default())
                .unwrap_or_else(|e| e.to_string());
            return FrameOutcome::Error(format!("server error frame: {message}"), user_data);
        }

        let event = match header.t.as_deref() {
            Some("#commit") => match decode_payload::<CommitWire>(payload) {
                Ok(wire) => {
                    if !valid_seq(user_data.last_seq, Some(wire.seq)) {
                        drop(permit);
                        return FrameOutcome::Error(format!("out-of-order seq {}", wire.seq), user_data);
                    }
                    user_data.last_seq = Some(wire.seq);
                    match build_commit(wire).await {
                        Ok(commit) => Event::Commit(commit),
                        Err(err) => {
                            drop(permit);
                            return FrameOutcome::Error(err.to_string(), user_data);
                        }
                    }
                }
                Err(err) => {
                    drop(permit);
                    return FrameOutcome::Error(err.to_string(), user_data);
                }
            },
            Some("#sync") => match decode_payload::<SyncWire>(payload) {
                Ok(wire) => {
                    if !valid_seq(user_data.last_seq, Some(wire.seq)) {
                        drop(permit);
                        return FrameOutcome::Error(format!("out-of-order seq {}", wire.seq), user_data);
                    }
                    user_data.last_seq = Some(wire.seq);
                    match build_sync(wire) {
                        Ok(sync) => Event::Sync(sync),
                        Err(err) => {
                            drop(permit);
                            return FrameOutcome::Error(err.to_string(), user_data);
                        }
                    }
                }
                Err(err) => {
                    drop(permit);
                    return FrameOutcome::Error(err.to_string(), user_data);
                }
            },
            Some("#identity") => match decode_payload::<IdentityWire>(payload) {
                Ok(wire) => {
                    if !valid_seq(user_data.last_seq, Some(wire.seq)) {
                        drop(permit);
                        return FrameOutcome::Error(format!("out-of-order seq {}", wire.seq), user_data);
                    }
                    user_data.last_seq = Some(wire.seq);
                    match build_identity(wire) {
                        Ok(identity) => Event::Identity(identity),
                        Err(err) => {
                            drop(permit);
                            return FrameOutcome::Error(err.to_string(), user_data);
                        }
                    }
                }
                Err(err) => {
                    drop(permit);
                    return FrameOutcome::Error(err.to_string(), user_data);
                }
            },
            Some("#account") => match decode_payload::<AccountWire>(payload) {
                Ok(wire) => {
                    if !valid_seq(user_data.last_seq, Some(wire.seq)) {
                        drop(permit);
                        return FrameOutcome::Error(format!("out-of-order seq {}", wire.seq), user_data);
                    }
                    user_data.last_seq = Some(wire.seq);
                    match build_account(wire) {
                        Ok(account) => Event::Account(account),
                        Err(err) => {
                            drop(permit);
                            return FrameOutcome::Error(err.to_string(), user_data);
                        }
                    }
                }
                Err(err) => {
                    drop(permit);
                    return FrameOutcome::Error(err.to_string(), user_data);
                }
            },
            Some("#info") => match decode_payload::<InfoWire>(payload) {
                Ok(wire) => Event::Info(build_info(wire)),
                Err(err) => {
                    drop(permit);
                    return FrameOutcome::Error(err.to_string(), user_data);
                }
            },
            Some(other) => {
                warn!(tag = other, "unknown firehose frame tag");
                drop(permit);
                return FrameOutcome::Noop(user_data);
            }
            None => {
                drop(permit);
                return FrameOutcome::Error("missing frame type tag".to_string(), user_data);
            }
        };

        let handler = self.handler.clone();
        spawn_dispatch(permit, async move { handler(event).await });
        FrameOutcome::Ok(user_data)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn adapter() -> FirehoseAdapter {
        let config = FirehoseConfig::new(Url::parse("wss://bsky.network").unwrap());
        FirehoseAdapter::new(config, Arc::new(|_event| Box::pin(async {})))
    }

    #[test]
    fn builds_path_without_cursor() {
        let adapter = adapter();
        assert_eq!(adapter.build_path(&FirehoseState::default()), "/xrpc/com.atproto.sync.subscribeRepos");
    }

    #[test]
    fn builds_path_with_cursor() {
        let adapter = adapter();
        let state = FirehoseState { last_seq: Some(42) };
        assert_eq!(adapter.build_path(&state), "/xrpc/com.atproto.sync.subscribeRepos?cursor=42");
    }
}
