//! Exercises `TapAdapter::handle_frame`'s ack/nack wiring against raw JSON
//! frames, without opening a real socket.

use std::sync::Arc;

use atproto_sync_core::{Frame, FrameOutcome, OutboundFrame, OutboundSender, StreamAdapter};
use atproto_sync_tap::{TapAdapter, TapConfig};
use tokio::sync::{mpsc, Semaphore};
use url::Url;

async fn permit() -> tokio::sync::OwnedSemaphorePermit {
    Arc::new(Semaphore::new(1)).acquire_owned().await.unwrap()
}

const RECORD_FRAME: &str = r#"{
    "id": 7,
    "type": "record",
    "record": {
        "live": true,
        "rev": "r",
        "did": "did:plc:x",
        "collection": "app.bsky.feed.post",
        "rkey": "k",
        "action": "create"
    }
}"#;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn acks_on_ok_outcome() {
    let config = TapConfig::new(Url::parse("wss://tap.example.com").unwrap());
    let adapter = TapAdapter::new(&config, Arc::new(|_event| Box::pin(async { Ok(()) })));

    let (tx, mut rx) = mpsc::channel(8);
    let state = adapter.init().await.unwrap();
    let state = adapter.on_connected(state, OutboundSender::new(tx)).await;

    let outcome = adapter.handle_frame(Frame::Text(RECORD_FRAME.to_string()), permit().await, state).await;
    assert!(matches!(outcome, FrameOutcome::Ok(_)));

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let frame = rx.try_recv().expect("exactly one ack frame");
    let OutboundFrame::Text(text) = frame else { panic!("expected a text frame") };
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value, serde_json::json!({ "type": "ack", "id": 7 }));
    assert!(rx.try_recv().is_err(), "no further outbound frames");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn no_ack_on_error_outcome() {
    let config = TapConfig::new(Url::parse("wss://tap.example.com").unwrap());
    let adapter = TapAdapter::new(&config, Arc::new(|_event| Box::pin(async { Err("boom".to_string()) })));

    let (tx, mut rx) = mpsc::channel(8);
    let state = adapter.init().await.unwrap();
    let state = adapter.on_connected(state, OutboundSender::new(tx)).await;

    let outcome = adapter.handle_frame(Frame::Text(RECORD_FRAME.to_string()), permit().await, state).await;
    assert!(matches!(outcome, FrameOutcome::Ok(_)));

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err(), "a declined handler must not emit an ack");
}
