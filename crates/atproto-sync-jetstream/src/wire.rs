//! JSON payload shapes, as they appear after zstd decompression.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct EventWire {
    pub did: String,
    pub time_us: i64,
    pub kind: String,
    #[serde(default)]
    pub commit: Option<CommitWire>,
    #[serde(default)]
    pub identity: Option<IdentityWire>,
    #[serde(default)]
    pub account: Option<AccountWire>,
}

#[derive(Debug, Deserialize)]
pub struct CommitWire {
    pub rev: String,
    pub operation: String,
    pub collection: String,
    pub rkey: String,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub cid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityWire {
    pub did: String,
    pub handle: Option<String>,
    pub seq: i64,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountWire {
    pub did: String,
    pub active: bool,
    #[serde(default)]
    pub status: Option<String>,
    pub seq: i64,
    pub time: String,
}
