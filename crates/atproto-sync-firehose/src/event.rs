//! The public Firehose event model.
//!
//! Parsing from the wire structs in [`crate::wire`] is total and lenient:
//! unknown string enums fall back to their raw string rather than failing
//! the whole event, and only a malformed timestamp fails the parse outright
//! (the adapter logs and drops on that path, same as a decode error).

use atproto_sync_codecs::CarBlocks;
use atproto_sync_core::{DecodeError, Record};
use chrono::{DateTime, Utc};

use crate::wire::{
    AccountStatusWire, AccountWire, CommitWire, IdentityWire, InfoWire, RepoOpActionWire, RepoOpWire, SyncWire,
};

/// One decoded Firehose event, handed to the user callback.
#[derive(Debug)]
pub enum Event {
    Commit(Commit),
    Sync(Sync),
    Identity(Identity),
    Account(Account),
    Info(Info),
}

#[derive(Debug)]
pub struct Commit {
    pub seq: i64,
    pub repo: String,
    pub commit: String,
    pub rev: String,
    pub since: Option<String>,
    pub ops: Vec<RepoOp>,
    pub time: DateTime<Utc>,
    /// Deprecated, preserved for wire compatibility.
    pub rebase: bool,
    /// Deprecated, preserved for wire compatibility.
    pub too_big: bool,
    /// Deprecated, preserved for wire compatibility.
    pub blobs: Vec<String>,
}

#[derive(Debug)]
pub struct RepoOp {
    pub action: RepoOpAction,
    pub path: String,
    pub cid: Option<String>,
    pub prev: Option<String>,
    pub record: Option<Record>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOpAction {
    Create,
    Update,
    Delete,
    Other(String),
}

#[derive(Debug)]
pub struct Sync {
    pub seq: i64,
    pub did: String,
    pub blocks: Vec<u8>,
    pub rev: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Identity {
    pub seq: i64,
    pub did: String,
    pub time: DateTime<Utc>,
    pub handle: Option<String>,
}

#[derive(Debug)]
pub struct Account {
    pub seq: i64,
    pub did: String,
    pub time: DateTime<Utc>,
    pub active: bool,
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountStatus {
    TakenDown,
    Suspended,
    Deleted,
    Deactivated,
    Desynchronized,
    Throttled,
    Other(String),
}

#[derive(Debug)]
pub struct Info {
    pub name: String,
    pub message: Option<String>,
}

pub(crate) async fn build_commit(wire: CommitWire) -> Result<Commit, DecodeError> {
    let time = parse_time(&wire.time)?;
    let car = CarBlocks::decode(&wire.blocks).await?;

    let mut ops = Vec::with_capacity(wire.ops.len());
    for op in wire.ops {
        ops.push(build_repo_op(op, &car)?);
    }

    Ok(Commit {
        seq: wire.seq,
        repo: wire.repo,
        commit: wire.commit.to_string(),
        rev: wire.rev,
        since: wire.since,
        ops,
        time,
        rebase: wire.rebase,
        too_big: wire.too_big,
        blobs: wire.blobs.into_iter().map(|cid| cid.to_string()).collect(),
    })
}

fn build_repo_op(wire: RepoOpWire, car: &CarBlocks) -> Result<RepoOp, DecodeError> {
    let record = match &wire.cid {
        Some(cid) => car.resolve_record(cid)?,
        None => None,
    };

    Ok(RepoOp {
        action: match wire.action {
            RepoOpActionWire::Create => RepoOpAction::Create,
            RepoOpActionWire::Update => RepoOpAction::Update,
            RepoOpActionWire::Delete => RepoOpAction::Delete,
            RepoOpActionWire::Other(s) => RepoOpAction::Other(s),
        },
        path: wire.path,
        cid: wire.cid.map(|cid| cid.to_string()),
        prev: wire.prev.map(|cid| cid.to_string()),
        record,
    })
}

pub(crate) fn build_sync(wire: SyncWire) -> Result<Sync, DecodeError> {
    Ok(Sync { seq: wire.seq, did: wire.did, blocks: wire.blocks, rev: wire.rev, time: parse_time(&wire.time)? })
}

pub(crate) fn build_identity(wire: IdentityWire) -> Result<Identity, DecodeError> {
    Ok(Identity { seq: wire.seq, did: wire.did, time: parse_time(&wire.time)?, handle: wire.handle })
}

pub(crate) fn build_account(wire: AccountWire) -> Result<Account, DecodeError> {
    Ok(Account {
        seq: wire.seq,
        did: wire.did,
        time: parse_time(&wire.time)?,
        active: wire.active,
        status: wire.status.map(|status| match status {
            AccountStatusWire::TakenDown => AccountStatus::TakenDown,
            AccountStatusWire::Suspended => AccountStatus::Suspended,
            AccountStatusWire::Deleted => AccountStatus::Deleted,
            AccountStatusWire::Deactivated => AccountStatus::Deactivated,
            AccountStatusWire::Desynchronized => AccountStatus::Desynchronized,
            AccountStatusWire::Throttled => AccountStatus::Throttled,
            AccountStatusWire::Other(s) => AccountStatus::Other(s),
        }),
    })
}

pub(crate) fn build_info(wire: InfoWire) -> Info {
    Info { name: wire.name, message: wire.message }
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DecodeError::Malformed(format!("time `{raw}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_time() {
        assert!(parse_time("2024-09-05T03:00:26.134Z").is_ok());
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(parse_time("not-a-time").is_err());
    }
}
