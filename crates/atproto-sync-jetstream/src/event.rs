//! The public Jetstream event model.

use atproto_sync_core::Record;

use crate::wire::{AccountWire, CommitWire, EventWire, IdentityWire};

/// One decoded Jetstream event, handed to the user callback.
#[derive(Debug)]
pub enum Event {
    Commit(Commit),
    Identity(Identity),
    Account(Account),
}

#[derive(Debug)]
pub struct Commit {
    pub did: String,
    pub time_us: i64,
    pub rev: String,
    pub operation: RepoOperation,
    pub collection: String,
    pub rkey: String,
    pub record: Option<Record>,
    pub cid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOperation {
    Create,
    Update,
    Delete,
    Other(String),
}

impl From<String> for RepoOperation {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "create" => RepoOperation::Create,
            "update" => RepoOperation::Update,
            "delete" => RepoOperation::Delete,
            _ => RepoOperation::Other(raw),
        }
    }
}

#[derive(Debug)]
pub struct Identity {
    pub did: String,
    pub time_us: i64,
    pub handle: Option<String>,
}

#[derive(Debug)]
pub struct Account {
    pub did: String,
    pub time_us: i64,
    pub active: bool,
    pub status: Option<String>,
}

/// Converts a decoded wire event into the public [`Event`] type, routing on
/// `kind`. Returns `None` for a recognized-but-empty or unknown `kind`; the
/// adapter logs and drops on that path rather than treating it as an error.
pub fn build_event(wire: EventWire) -> Option<Event> {
    match wire.kind.as_str() {
        "commit" => wire.commit.map(|commit| Event::Commit(build_commit(wire.did, wire.time_us, commit))),
        "identity" => wire.identity.map(|identity| Event::Identity(build_identity(wire.time_us, identity))),
        "account" => wire.account.map(|account| Event::Account(build_account(wire.time_us, account))),
        _ => None,
    }
}

fn build_commit(did: String, time_us: i64, wire: CommitWire) -> Commit {
    Commit {
        did,
        time_us,
        rev: wire.rev,
        operation: wire.operation.into(),
        collection: wire.collection,
        rkey: wire.rkey,
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

fn build_identity(time_us: i64, wire: IdentityWire) -> Identity {
    Identity { did: wire.did, time_us, handle: wire.handle }
}

fn build_account(time_us: i64, wire: AccountWire) -> Account {
    Account { did: wire.did, time_us, active: wire.active, status: wire.status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::EventWire;

    #[test]
    fn builds_commit_event_and_routes_record() {
        let json = r#"{
            "did": "did:plc:x",
            "time_us": 1725519626134432,
            "kind": "commit",
            "commit": {
                "rev": "r",
                "operation": "create",
                "collection": "app.bsky.feed.post",
                "rkey": "k",
                "record": {"text": "hello"}
            }
        }"#;
        let wire: EventWire = serde_json::from_str(json).unwrap();
        let time_us = wire.time_us;
        let event = build_event(wire).expect("commit payload present");
        match event {
            Event::Commit(commit) => {
                assert_eq!(commit.time_us, time_us);
                assert_eq!(commit.operation, RepoOperation::Create);
                assert!(commit.record.is_some());
            }
            _ => panic!("expected a commit event"),
        }
    }

    #[test]
    fn unknown_kind_returns_none() {
        let json = r#"{"did": "did:plc:x", "time_us": 1, "kind": "future_kind"}"#;
        let wire: EventWire = serde_json::from_str(json).unwrap();
        assert!(build_event(wire).is_none());
    }
}
