use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tracker as reported by the tracker service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub key: String,
    #[serde(default)]
    pub running: bool,
    /// Already formatted by the service, e.g. "1h 2m 3s".
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumResponse {
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionBody {
    pub description: String,
}

/// Issue metadata from the local export cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Empty in entries that rely on the map key; the cache reader fills it in.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub summary: String,
    /// Anything else the export pipeline writes; carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
impl Issue {
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Issue cache contents keyed by issue key.
pub type IssueMap = BTreeMap<String, Issue>;

/// Tracker list plus the formatted total, fetched once per invocation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub trackers: Vec<Tracker>,
    pub total_duration: String,
}
