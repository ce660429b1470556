//! Converts decoded DagCBOR (`ipld_core::ipld::Ipld`) into the plain
//! JSON-shaped [`Record`] every adapter hands to dispatch.
//!
//! CID links and raw byte strings have no native JSON representation, so
//! both are flattened to strings: links to their `bafy.../did:...` text
//! form, bytes to base64. Nothing downstream needs to tell a flattened link
//! apart from an ordinary string field — that distinction only matters to
//! code that resolves records out of a CAR archive, which works from the
//! original `Cid` before this conversion runs.

use base64::Engine;
use ipld_core::ipld::Ipld;
use serde_json::{Map, Number, Value};

use atproto_sync_core::Record;

/// Converts one decoded IPLD value into a JSON value.
pub fn ipld_to_json(value: Ipld) -> Value {
    match value {
        Ipld::Null => Value::Null,
        Ipld::Bool(b) => Value::Bool(b),
        Ipld::Integer(i) => Value::Number(integer_to_number(i)),
        Ipld::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Ipld::String(s) => Value::String(s),
        Ipld::Bytes(bytes) => Value::String(base64::engine::general_purpose::STANDARD.encode(bytes)),
        Ipld::List(items) => Value::Array(items.into_iter().map(ipld_to_json).collect()),
        Ipld::Map(map) => Value::Object(map.into_iter().map(|(k, v)| (k, ipld_to_json(v))).collect()),
        Ipld::Link(cid) => Value::String(cid.to_string()),
    }
}

/// Converts a top-level IPLD map into a [`Record`], the shape every adapter
/// surfaces decoded payloads as. Non-map values convert to a single-entry
/// `{"value": ...}` record rather than being discarded.
pub fn ipld_to_record(value: Ipld) -> Record {
    match ipld_to_json(value) {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

fn integer_to_number(i: i128) -> Number {
    if let Ok(i) = i64::try_from(i) {
        Number::from(i)
    } else if let Ok(u) = u64::try_from(i) {
        Number::from(u)
    } else {
        Number::from_f64(i as f64).unwrap_or_else(|| Number::from(0))
    }
}
