//! Decompresses Jetstream's zstd-with-dictionary binary frames.

use std::sync::{Mutex, OnceLock};

use atproto_sync_core::DecodeError;

/// Jetstream's published dictionary, trained on the event shapes it
/// actually emits. Bundled at compile time rather than fetched at runtime,
/// same as any other process-wide, immutable, first-use resource.
const DICTIONARY: &[u8] = include_bytes!("jetstream.dict");

/// Ceiling on a single decompressed event, matching the adapter's default
/// `max_message_size_bytes`.
const MAX_DECOMPRESSED_SIZE: usize = 16 * 1024 * 1024;

/// The dictionary's entropy tables are rebuilt from `DICTIONARY` on
/// construction, so the decompressor is built once on first use and reused
/// for every frame afterward rather than re-derived per call. `Mutex` because
/// `Decompressor::decompress` takes `&mut self` and frames can arrive from
/// concurrent connections.
static DECOMPRESSOR: OnceLock<Mutex<zstd::bulk::Decompressor<'static>>> = OnceLock::new();

/// Decompresses one Jetstream binary frame into its underlying JSON bytes.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let decompressor = DECOMPRESSOR.get_or_init(|| {
        let decompressor = zstd::bulk::Decompressor::with_dictionary(DICTIONARY)
            .expect("bundled jetstream dictionary is valid zstd dictionary data");
        Mutex::new(decompressor)
    });
    decompressor
        .lock()
        .unwrap()
        .decompress(bytes, MAX_DECOMPRESSED_SIZE)
        .map_err(|e| DecodeError::Malformed(format!("zstd: {e}")))
}
