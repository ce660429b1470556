//! The public Tap event model.

use atproto_sync_core::Record;

use crate::wire::{ActionWire, EventWire, IdentityStatusWire, IdentityWire, RecordWire};

/// One decoded Tap event, handed to the user callback. `id` is what
/// [`crate::adapter::TapAdapter`] echoes back in an ack.
#[derive(Debug)]
pub enum Event {
    Record(RecordEvent),
    Identity(IdentityEvent),
}

#[derive(Debug)]
pub struct RecordEvent {
    pub id: i64,
    pub live: bool,
    pub rev: String,
    pub did: String,
    pub collection: String,
    pub rkey: String,
    pub action: RepoAction,
    pub record: Option<Record>,
    pub cid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoAction {
    Create,
    Update,
    Delete,
    Other(String),
}

#[derive(Debug)]
pub struct IdentityEvent {
    pub id: i64,
    pub did: String,
    pub handle: Option<String>,
    pub is_active: bool,
    pub status: Option<IdentityStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityStatus {
    TakenDown,
    Suspended,
    Deleted,
    Deactivated,
    Desynchronized,
    Throttled,
    Other(String),
}

/// Converts a decoded wire event into the public [`Event`] type, returning
/// the event's `id` alongside it so the adapter can ack without re-matching.
pub fn build_event(wire: EventWire) -> Option<(i64, Event)> {
    let id = wire.id;
    match wire.kind.as_str() {
        "record" => wire.record.map(|record| (id, Event::Record(build_record(id, record)))),
        "identity" => wire.identity.map(|identity| (id, Event::Identity(build_identity(id, identity)))),
        _ => None,
    }
}

fn build_record(id: i64, wire: RecordWire) -> RecordEvent {
    RecordEvent {
        id,
        live: wire.live,
        rev: wire.rev,
        did: wire.did,
        collection: wire.collection,
        rkey: wire.rkey,
        action: match wire.action {
            ActionWire::Create => RepoAction::Create,
            ActionWire::Update => RepoAction::Update,
            ActionWire::Delete => RepoAction::Delete,
            ActionWire::Other(s) => RepoAction::Other(s),
        },
        record: wire.record.map(json_to_record),
        cid: wire.cid,
    }
}

fn json_to_record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = Record::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

fn build_identity(id: i64, wire: IdentityWire) -> IdentityEvent {
    IdentityEvent {
        id,
        did: wire.did,
        handle: wire.handle,
        is_active: wire.is_active,
        status: wire.status.map(|status| match status {
            IdentityStatusWire::TakenDown => IdentityStatus::TakenDown,
            IdentityStatusWire::Suspended => IdentityStatus::Suspended,
            IdentityStatusWire::Deleted => IdentityStatus::Deleted,
            IdentityStatusWire::Deactivated => IdentityStatus::Deactivated,
            IdentityStatusWire::Desynchronized => IdentityStatus::Desynchronized,
            IdentityStatusWire::Throttled => IdentityStatus::Throttled,
            IdentityStatusWire::Other(s) => IdentityStatus::Other(s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::EventWire;

    #[test]
    fn builds_record_event_with_id() {
        let json = r#"{
            "id": 7,
            "type": "record",
            "record": {
                "live": true,
                "rev": "r",
                "did": "did:plc:x",
                "collection": "app.bsky.feed.post",
                "rkey": "k",
                "action": "create",
                "record": {"text": "hi"}
            }
        }"#;
        let wire: EventWire = serde_json::from_str(json).unwrap();
        let (id, event) = build_event(wire).expect("record payload present");
        assert_eq!(id, 7);
        match event {
            Event::Record(record) => {
                assert_eq!(record.action, RepoAction::Create);
                assert!(record.record.is_some());
            }
            _ => panic!("expected a record event"),
        }
    }

    #[test]
    fn unknown_kind_returns_none() {
        let json = r#"{"id": 1, "type": "future_kind"}"#;
        let wire: EventWire = serde_json::from_str(json).unwrap();
        assert!(build_event(wire).is_none());
    }
}
