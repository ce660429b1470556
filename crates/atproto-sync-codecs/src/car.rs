//! Resolves CIDs against the CAR archive carried in a Firehose commit's
//! `blocks` field.

use std::collections::HashMap;

use atproto_sync_core::DecodeError;
use futures::StreamExt;
use iroh_car::{CarReader, Cid};

/// The decoded block set from one commit's `blocks` archive.
///
/// Firehose ships one CAR archive per commit event; this holds every block
/// it contained so [`CarBlocks::resolve`] can look a `RepoOp`'s `cid` up
/// without re-parsing the archive per operation.
pub struct CarBlocks {
    blocks: HashMap<Cid, Vec<u8>>,
}

impl CarBlocks {
    /// Parses a CAR archive from `bytes`.
    pub async fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let reader = CarReader::new(bytes)
            .await
            .map_err(|e| DecodeError::Malformed(format!("CAR header: {e}")))?;

        let mut blocks = HashMap::new();
        let mut stream = Box::pin(reader.stream());
        while let Some(block) = stream.next().await {
            let (cid, data) = block.map_err(|e| DecodeError::Malformed(format!("CAR block: {e}")))?;
            blocks.insert(cid, data);
        }

        Ok(Self { blocks })
    }

    /// Returns the raw DagCBOR bytes for `cid`, if the archive contained it.
    pub fn get(&self, cid: &Cid) -> Option<&[u8]> {
        self.blocks.get(cid).map(Vec::as_slice)
    }

    /// Decodes the block for `cid` as DagCBOR into a [`atproto_sync_core::Record`].
    ///
    /// Returns `Ok(None)` (not an error) when the archive simply doesn't
    /// contain the block — callers treat a missing record as `record: None`
    /// rather than a decode failure.
    pub fn resolve_record(&self, cid: &Cid) -> Result<Option<atproto_sync_core::Record>, DecodeError> {
        let Some(bytes) = self.get(cid) else {
            return Ok(None);
        };
        let ipld: ipld_core::ipld::Ipld =
            serde_ipld_dagcbor::from_slice(bytes).map_err(|e| DecodeError::Malformed(format!("record block: {e}")))?;
        Ok(Some(crate::ipld_json::ipld_to_record(ipld)))
    }
}
