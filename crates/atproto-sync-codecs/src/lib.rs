//! Wire codecs shared by the AT Protocol sync adapters.
//!
//! Firehose needs DagCBOR (header/payload pairs) and CAR (commit block
//! archives); Jetstream needs zstd-with-dictionary; Tap needs nothing beyond
//! plain JSON, which `serde_json` already covers without help from this
//! crate. Nothing here knows about event types or cursors — it only turns
//! bytes into the generic [`atproto_sync_core::Record`] shape or raw decoded
//! bytes.

mod car;
mod dagcbor;
mod ipld_json;
mod zstd_dict;

pub use car::CarBlocks;
pub use dagcbor::{decode_frame, decode_header, decode_payload, FrameHeader};
pub use ipld_json::{ipld_to_json, ipld_to_record};
pub use zstd_dict::decompress as zstd_decompress;

pub use iroh_car::Cid;
pub use ipld_core::ipld::Ipld;
