//! Exercises `FirehoseAdapter::handle_frame` directly against raw DagCBOR
//! frames, the way the engine would feed it, without opening a real socket.
//! State is only ever obtained through the `StreamAdapter` trait, never
//! constructed by hand, since `FirehoseState`'s field is private.

use std::sync::{Arc, Mutex};

use atproto_sync_core::{DisconnectReason, Frame, FrameOutcome, StreamAdapter};
use atproto_sync_firehose::{FirehoseAdapter, FirehoseConfig};
use serde::Serialize;
use tokio::sync::Semaphore;
use url::Url;

#[derive(Serialize)]
struct WireHeader {
    op: i8,
    t: &'static str,
}

#[derive(Serialize)]
struct IdentityPayload {
    seq: i64,
    did: &'static str,
    time: &'static str,
}

fn identity_frame(seq: i64) -> Vec<u8> {
    let mut bytes = Vec::new();
    serde_ipld_dagcbor::to_writer(&mut bytes, &WireHeader { op: 1, t: "#identity" }).unwrap();
    serde_ipld_dagcbor::to_writer(
        &mut bytes,
        &IdentityPayload { seq, did: "did:plc:abc", time: "2024-09-05T03:00:26.134Z" },
    )
    .unwrap();
    bytes
}

async fn permit() -> tokio::sync::OwnedSemaphorePermit {
    Arc::new(Semaphore::new(1)).acquire_owned().await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resumes_from_configured_cursor_and_rejects_stale_seq() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let handler_events = events.clone();
    let config = FirehoseConfig::new(Url::parse("wss://bsky.network").unwrap()).cursor(1000);
    let adapter = FirehoseAdapter::new(
        config,
        Arc::new(move |event| {
            handler_events.lock().unwrap().push(format!("{event:?}"));
            Box::pin(async {})
        }),
    );

    let state = adapter.init().await.expect("init never fails for firehose");
    assert_eq!(adapter.build_path(&state), "/xrpc/com.atproto.sync.subscribeRepos?cursor=1000");

    let outcome = adapter.handle_frame(Frame::Binary(identity_frame(1001)), permit().await, state).await;
    let state = match outcome {
        FrameOutcome::Ok(state) => state,
        other => panic!("expected Ok, got {other:?}"),
    };
    assert_eq!(adapter.build_path(&state), "/xrpc/com.atproto.sync.subscribeRepos?cursor=1001");

    let outcome = adapter.handle_frame(Frame::Binary(identity_frame(500)), permit().await, state).await;
    match outcome {
        FrameOutcome::Error(_, state) => {
            assert_eq!(adapter.build_path(&state), "/xrpc/com.atproto.sync.subscribeRepos?cursor=1001");
        }
        other => panic!("expected a rejected out-of-order seq, got {other:?}"),
    }

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(events.lock().unwrap().len(), 1, "only the seq=1001 frame should have dispatched");
}

#[tokio::test]
async fn disconnect_preserves_cursor_for_the_next_connect_path() {
    let config = FirehoseConfig::new(Url::parse("wss://bsky.network").unwrap()).cursor(2000);
    let adapter = FirehoseAdapter::new(config, Arc::new(|_event| Box::pin(async {})));

    let state = adapter.init().await.unwrap();
    let state = adapter
        .on_disconnected(DisconnectReason::TransportError { message: "reset".into() }, state)
        .await;

    assert_eq!(adapter.build_path(&state), "/xrpc/com.atproto.sync.subscribeRepos?cursor=2000");
}
