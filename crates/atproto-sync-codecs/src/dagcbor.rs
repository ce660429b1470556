//! Decodes a Firehose frame: two concatenated DagCBOR items, header then
//! payload.

use std::io::Cursor;

use atproto_sync_core::DecodeError;
use ipld_core::ipld::Ipld;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The fixed header every Firehose frame opens with.
#[derive(Debug, Clone, Deserialize)]
pub struct FrameHeader {
    /// `1` for a regular event, `-1` for a server-side error.
    pub op: i8,
    /// Event type tag (`#commit`, `#sync`, ...), absent on error frames.
    #[serde(default)]
    pub t: Option<String>,
}

/// Decodes one binary Firehose frame into its header and raw payload.
///
/// The payload is left as [`Ipld`] rather than a concrete struct: which
/// struct it deserializes into depends on `header.t`, which the caller
/// determines after reading the header.
pub fn decode_frame(bytes: &[u8]) -> Result<(FrameHeader, Ipld), DecodeError> {
    let mut cursor = Cursor::new(bytes);

    let header: FrameHeader = serde_ipld_dagcbor::from_reader(&mut cursor)
        .map_err(|e| DecodeError::Malformed(format!("frame header: {e}")))?;

    let payload: Ipld = serde_ipld_dagcbor::from_reader(&mut cursor)
        .map_err(|e| DecodeError::Malformed(format!("frame payload: {e}")))?;

    Ok((header, payload))
}

/// Decodes just the header, returning it along with the byte offset where
/// the payload starts. Lets a caller that knows the concrete payload type
/// for `header.t` deserialize it directly instead of going through [`Ipld`].
pub fn decode_header(bytes: &[u8]) -> Result<(FrameHeader, usize), DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let header: FrameHeader = serde_ipld_dagcbor::from_reader(&mut cursor)
        .map_err(|e| DecodeError::Malformed(format!("frame header: {e}")))?;
    Ok((header, cursor.position() as usize))
}

/// Decodes `bytes` as a concrete payload type `T`.
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_ipld_dagcbor::from_slice(bytes).map_err(|e| DecodeError::Malformed(format!("frame payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct WireHeader {
        op: i8,
        t: &'static str,
    }

    #[derive(Serialize)]
    struct WirePayload {
        seq: i64,
        did: &'static str,
    }

    #[test]
    fn decodes_header_then_payload_in_order() {
        let mut bytes = Vec::new();
        serde_ipld_dagcbor::to_writer(&mut bytes, &WireHeader { op: 1, t: "#commit" }).unwrap();
        serde_ipld_dagcbor::to_writer(&mut bytes, &WirePayload { seq: 42, did: "did:plc:abc" }).unwrap();

        let (header, payload) = decode_frame(&bytes).unwrap();
        assert_eq!(header.op, 1);
        assert_eq!(header.t.as_deref(), Some("#commit"));

        let Ipld::Map(map) = payload else { panic!("expected a map payload") };
        assert_eq!(map.get("seq"), Some(&Ipld::Integer(42)));
    }

    #[test]
    fn rejects_truncated_frames() {
        let mut bytes = Vec::new();
        serde_ipld_dagcbor::to_writer(&mut bytes, &WireHeader { op: 1, t: "#commit" }).unwrap();
        assert!(decode_frame(&bytes).is_err());
    }
}
