//! # atproto-sync
//!
//! A client library for AT Protocol sync event streams: Firehose, Jetstream,
//! and Tap, each driven by a shared connection engine.
//!
//! ## Overview
//!
//! Firehose, Jetstream, and Tap are three different wire formats for the
//! same underlying idea: a long-lived WebSocket that streams repo events and
//! reconnects with backoff when it drops. This crate factors that shared
//! behavior into one connection engine (`atproto-sync-engine`) and expresses
//! each protocol as a small adapter plugged into it.
//!
//! ```text
//! ┌──────────┐     ┌────────────────────┐     ┌───────────────┐
//! │  Engine  │────▶│ connect / upgrade  │────▶│ StreamAdapter │──▶ your handler
//! │ (4-state)│     │ / ingress / backoff│     │ (Firehose/    │
//! └──────────┘     └────────────────────┘     │  Jetstream/   │
//!                                              │  Tap)         │
//!                                              └───────────────┘
//! ```
//!
//! - **Engine**: connects, upgrades, reads frames under flow credit, and
//!   reconnects with jittered exponential backoff.
//! - **Adapters**: per-protocol path construction, header/payload decoding,
//!   and event routing — `atproto-sync-firehose`, `atproto-sync-jetstream`,
//!   `atproto-sync-tap`.
//! - **Handlers**: your own `Fn(Event) -> Future` callback, invoked once per
//!   decoded event.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use atproto_sync::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     atproto_sync::logging::init();
//!
//!     let config = firehose::FirehoseConfig::new(url::Url::parse("wss://bsky.network")?);
//!     let handle = firehose::start(config, Arc::new(|event| {
//!         Box::pin(async move {
//!             tracing::info!(?event, "firehose event");
//!         })
//!     })).await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop();
//!     Ok(())
//! }
//! ```
//!
//! Each protocol has its own `Event` type and its own `start` function, so
//! they're exposed as namespaced modules ([`firehose`], [`jetstream`],
//! [`tap`]) rather than flattened into one name: `Event` and `start` would
//! otherwise collide across the three.

pub use atproto_sync_firehose as firehose;
pub use atproto_sync_jetstream as jetstream;
pub use atproto_sync_tap as tap;

pub mod logging;

/// Core types shared by every adapter: [`ConnectionState`](atproto_sync_engine::ConnectionState),
/// [`EngineHandle`](atproto_sync_engine::EngineHandle), [`TlsOptions`](atproto_sync_core::TlsOptions),
/// [`ReconnectStrategy`](atproto_sync_core::ReconnectStrategy), and the error/record types.
pub mod prelude {
    pub use atproto_sync_core::{
        DecodeError, InitError, ProtocolError, Record, ReconnectStrategy, StreamAdapter, TlsOptions,
    };
    pub use atproto_sync_engine::{ConnectionState, EngineHandle};

    pub use crate::{firehose, jetstream, tap};
}
