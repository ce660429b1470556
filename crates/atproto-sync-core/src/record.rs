//! The decoded-record representation shared by every adapter.

/// An arbitrary decoded record body: a JSON-shaped object of strings,
/// numbers, bools, nulls, nested arrays/objects, and CID links.
///
/// Firehose decodes these from DagCBOR (via `atproto-sync-codecs`), Jetstream
/// and Tap receive them already as JSON — both funnel into this same shape so
/// downstream code doesn't need to know which wire format produced it. CID
/// links are represented as their string form (`did:...`/`bafy...`) rather
/// than a dedicated type, since nothing in this crate family interprets them
/// beyond passing them along.
pub type Record = serde_json::Map<String, serde_json::Value>;
