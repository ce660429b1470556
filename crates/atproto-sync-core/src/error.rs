//! Unified error types for the AT Protocol sync client family.
//!
//! Only initialization errors (and, in the Tap crate, HTTP admin errors) are
//! ever surfaced to a caller — see the propagation policy in the crate's
//! design notes. Decode and protocol errors defined here are logged and
//! dropped by the component that detects them; they never escape as `Err`
//! values from a running stream.

use thiserror::Error;

/// Fatal error raised by [`crate::StreamAdapter::init`], or by the engine
/// when a transport could never be opened in the first place.
///
/// Initialization errors abort the stream instance; the engine does not
/// retry them. Anything transient (a timed-out upgrade, a dropped socket) is
/// a [`DisconnectReason`](crate::DisconnectReason), not an `InitError`.
#[derive(Debug, Clone, Error)]
pub enum InitError {
    /// The supplied configuration failed validation (e.g. too many wanted
    /// DIDs, an unparsable host URL).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Adapter-specific setup failed (e.g. the zstd dictionary could not be
    /// loaded).
    #[error("adapter initialization failed: {0}")]
    AdapterSetup(String),

    /// The transport could not be opened at all (DNS failure, connection
    /// refused, TLS handshake rejected before any upgrade was attempted).
    /// Unlike a timed-out or dropped connection, retrying won't help until
    /// something external changes, so the engine stops instead of
    /// reconnecting forever.
    #[error("connection could not be established: {0}")]
    ConnectFailed(String),
}

/// Internal, log-and-drop decode failure (malformed CBOR/JSON/zstd, or a
/// datetime that doesn't parse as ISO-8601).
///
/// Never returned from a public API; adapters convert these into a
/// `tracing::warn!` and move on to the next frame.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The frame payload was not valid for the adapter's codec.
    #[error("decode failed: {0}")]
    Malformed(String),

    /// A required field was missing from an otherwise well-formed payload.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// An enum-valued field held a tag the adapter doesn't recognize.
    #[error("unknown tag `{0}`")]
    UnknownTag(String),
}

/// Internal, log-and-drop protocol violation (non-monotonic sequence,
/// malformed control frame).
///
/// Like [`DecodeError`], never returned from a public API.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// A Firehose `seq` did not satisfy `valid_seq?` against the last
    /// accepted sequence.
    #[error("out-of-order seq {seq} (last accepted {last:?})")]
    OutOfOrderSeq {
        /// The rejected sequence number.
        seq: i64,
        /// The last sequence number this adapter accepted, if any.
        last: Option<i64>,
    },

    /// Some other protocol-level inconsistency.
    #[error("protocol violation: {0}")]
    Other(String),
}

/// Result alias for initialization.
pub type InitResult<T> = Result<T, InitError>;
