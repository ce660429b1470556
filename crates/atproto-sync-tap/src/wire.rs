//! JSON ingress shapes for the Tap WebSocket channel.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct EventWire {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub record: Option<RecordWire>,
    #[serde(default)]
    pub identity: Option<IdentityWire>,
}

#[derive(Debug, Deserialize)]
pub struct RecordWire {
    pub live: bool,
    pub rev: String,
    pub did: String,
    pub collection: String,
    pub rkey: String,
    pub action: ActionWire,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub cid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionWire {
    Create,
    Update,
    Delete,
    Other(String),
}

impl<'de> Deserialize<'de> for ActionWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "create" => ActionWire::Create,
            "update" => ActionWire::Update,
            "delete" => ActionWire::Delete,
            other => ActionWire::Other(other.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentityWire {
    pub did: String,
    #[serde(default)]
    pub handle: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub status: Option<IdentityStatusWire>,
}

#[derive(Debug, Clone)]
pub enum IdentityStatusWire {
    TakenDown,
    Suspended,
    Deleted,
    Deactivated,
    Desynchronized,
    Throttled,
    Other(String),
}

impl<'de> Deserialize<'de> for IdentityStatusWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "takendown" => IdentityStatusWire::TakenDown,
            "suspended" => IdentityStatusWire::Suspended,
            "deleted" => IdentityStatusWire::Deleted,
            "deactivated" => IdentityStatusWire::Deactivated,
            "desynchronized" => IdentityStatusWire::Desynchronized,
            "throttled" => IdentityStatusWire::Throttled,
            other => IdentityStatusWire::Other(other.to_string()),
        })
    }
}
