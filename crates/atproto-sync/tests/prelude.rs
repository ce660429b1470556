//! Smoke test: the facade's public surface compiles and wires together the
//! way the quick-start doc example shows.

use atproto_sync::prelude::*;
use std::sync::Arc;

#[test]
fn logging_try_init_does_not_panic() {
    let _ = atproto_sync::logging::LoggingBuilder::new().with_level(tracing::Level::DEBUG).try_init();
}

#[tokio::test]
async fn builds_a_firehose_config_through_the_facade_module() {
    let config = firehose::FirehoseConfig::new(url::Url::parse("wss://bsky.network").unwrap()).cursor(42);
    let adapter = firehose::FirehoseAdapter::new(config, Arc::new(|_event| Box::pin(async {})));

    // `build_path` is reachable through the re-exported `StreamAdapter` trait.
    let state: atproto_sync_firehose::FirehoseState = Default::default();
    let _ = adapter.build_path(&state);
}

#[test]
fn reconnect_strategy_is_reachable_from_the_prelude() {
    let strategy = ReconnectStrategy::default();
    assert!(strategy.delay_for(0).as_secs_f64() >= 1.0);
}
