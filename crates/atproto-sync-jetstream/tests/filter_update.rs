//! Exercises `JetstreamAdapter` against raw JSON frames and its
//! `update_options` control path, without opening a real socket.

use std::sync::Arc;

use atproto_sync_core::{Frame, FrameOutcome, OutboundFrame, OutboundSender, StreamAdapter};
use atproto_sync_jetstream::{JetstreamAdapter, JetstreamConfig};
use tokio::sync::{mpsc, Semaphore};
use url::Url;

async fn permit() -> tokio::sync::OwnedSemaphorePermit {
    Arc::new(Semaphore::new(1)).acquire_owned().await.unwrap()
}

#[tokio::test]
async fn update_options_sends_exactly_one_control_frame() {
    let config = JetstreamConfig::new(Url::parse("wss://jetstream.example").unwrap())
        .wanted_collections(vec!["app.bsky.feed.post".to_string()]);
    let adapter = JetstreamAdapter::new(config, Arc::new(|_event| Box::pin(async {})));

    let (tx, mut rx) = mpsc::channel(8);
    let state = adapter.init().await.unwrap();
    let _state = adapter.on_connected(state, OutboundSender::new(tx)).await;

    adapter.update_options(Some(Vec::new()), None, None).await.expect("connection is live");

    let frame = rx.try_recv().expect("exactly one outbound frame");
    let OutboundFrame::Text(text) = frame else { panic!("expected a text frame") };
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "type": "options_update", "payload": { "wantedCollections": [] } })
    );
    assert!(rx.try_recv().is_err(), "no further outbound frames");
}

#[tokio::test]
async fn cursor_equals_event_time_us_immediately_after_dispatch() {
    let config = JetstreamConfig::new(Url::parse("wss://jetstream.example").unwrap());
    let adapter = JetstreamAdapter::new(config, Arc::new(|_event| Box::pin(async {})));

    let state = adapter.init().await.unwrap();
    let json = r#"{
        "did": "did:plc:x",
        "time_us": 1725519626134432,
        "kind": "commit",
        "commit": {
            "rev": "r",
            "operation": "create",
            "collection": "c",
            "rkey": "k"
        }
    }"#;

    let outcome = adapter.handle_frame(Frame::Text(json.to_string()), permit().await, state).await;
    let state = match outcome {
        FrameOutcome::Ok(state) => state,
        other => panic!("expected Ok, got {other:?}"),
    };

    assert!(adapter.build_path(&state).contains("cursor=1725519626134432"));
}
