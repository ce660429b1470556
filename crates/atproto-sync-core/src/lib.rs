//! Shared types for the AT Protocol sync client family.
//!
//! This crate has no idea what Firehose, Jetstream, or Tap are. It defines
//! the contract a connection engine drives a stream protocol through (the
//! [`StreamAdapter`] trait), the frame and lifecycle types that contract is
//! built from, and the small pieces of behavior — backoff, flow-credit
//! dispatch, TLS policy — that every adapter needs identically.
//!
//! `atproto-sync-engine` implements the state machine against this contract;
//! `atproto-sync-firehose`, `atproto-sync-jetstream`, and `atproto-sync-tap`
//! each implement [`StreamAdapter`] once.

mod adapter;
mod config;
mod dispatch;
mod error;
mod frame;
mod outbound;
mod reconnect;
mod record;
mod tls;

pub use adapter::{FrameOutcome, StreamAdapter};
pub use config::{EngineConfig, DEFAULT_FLOW_CREDIT, DEFAULT_TIMEOUT};
pub use dispatch::{spawn_dispatch, FlowCredit};
pub use error::{DecodeError, InitError, InitResult, ProtocolError};
pub use frame::{DisconnectReason, Frame};
pub use outbound::{OutboundFrame, OutboundSender, SendError};
pub use reconnect::ReconnectStrategy;
pub use record::Record;
pub use tls::TlsOptions;
