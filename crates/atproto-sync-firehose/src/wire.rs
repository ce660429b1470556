//! DagCBOR payload shapes, as they appear on the wire.
//!
//! These mirror the `com.atproto.sync.subscribeRepos` lexicon closely enough
//! to deserialize directly; [`crate::event`] holds the friendlier types built
//! from these plus resolved records.

use std::fmt;

use atproto_sync_codecs::Cid;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CommitWire {
    pub seq: i64,
    pub repo: String,
    pub commit: Cid,
    pub rev: String,
    #[serde(default)]
    pub since: Option<String>,
    #[serde(with = "serde_bytes")]
    pub blocks: Vec<u8>,
    #[serde(default)]
    pub ops: Vec<RepoOpWire>,
    pub time: String,
    #[serde(default)]
    pub rebase: bool,
    #[serde(default, rename = "tooBig")]
    pub too_big: bool,
    #[serde(default)]
    pub blobs: Vec<Cid>,
}

#[derive(Debug, Deserialize)]
pub struct RepoOpWire {
    pub action: RepoOpActionWire,
    pub path: String,
    #[serde(default)]
    pub cid: Option<Cid>,
    #[serde(default)]
    pub prev: Option<Cid>,
}

#[derive(Debug, Clone)]
pub enum RepoOpActionWire {
    Create,
    Update,
    Delete,
    Other(String),
}

impl<'de> Deserialize<'de> for RepoOpActionWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ActionVisitor;
        impl Visitor<'_> for ActionVisitor {
            type Value = RepoOpActionWire;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a repo op action string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match v {
                    "create" => RepoOpActionWire::Create,
                    "update" => RepoOpActionWire::Update,
                    "delete" => RepoOpActionWire::Delete,
                    other => RepoOpActionWire::Other(other.to_string()),
                })
            }
        }
        deserializer.deserialize_str(ActionVisitor)
    }
}

#[derive(Debug, Deserialize)]
pub struct SyncWire {
    pub seq: i64,
    pub did: String,
    #[serde(with = "serde_bytes")]
    pub blocks: Vec<u8>,
    pub rev: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct IdentityWire {
    pub seq: i64,
    pub did: String,
    pub time: String,
    #[serde(default)]
    pub handle: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountWire {
    pub seq: i64,
    pub did: String,
    pub time: String,
    pub active: bool,
    #[serde(default)]
    pub status: Option<AccountStatusWire>,
}

#[derive(Debug, Clone)]
pub enum AccountStatusWire {
    TakenDown,
    Suspended,
    Deleted,
    Deactivated,
    Desynchronized,
    Throttled,
    Other(String),
}

impl<'de> Deserialize<'de> for AccountStatusWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "takendown" => AccountStatusWire::TakenDown,
            "suspended" => AccountStatusWire::Suspended,
            "deleted" => AccountStatusWire::Deleted,
            "deactivated" => AccountStatusWire::Deactivated,
            "desynchronized" => AccountStatusWire::Desynchronized,
            "throttled" => AccountStatusWire::Throttled,
            other => AccountStatusWire::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct InfoWire {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorWire {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
