use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A single (key, value, ttl) write sent to the store on each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Full key, `path + "/" + service`
    pub key: String,

    /// Announced value: static message or interface address
    pub value: String,

    /// Expiration in seconds, counted from this write
    pub ttl: u64,
}

/// The record as the store reports it after a successful set.
/// Key and value may differ from the request if the store normalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNode {
    pub key: String,

    #[serde(default)]
    pub value: String,

    /// Absolute expiry time, absent for keys without a TTL
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,

    /// Remaining TTL in seconds at the time of the reply
    #[serde(default)]
    pub ttl: Option<i64>,

    #[serde(default)]
    pub modified_index: u64,

    #[serde(default)]
    pub created_index: u64,
}
