use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Workflow status of a tracked domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    #[default]
    Pending,
    Copied,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainStatus::Pending => "pending",
            DomainStatus::Copied => "copied",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DomainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(DomainStatus::Pending),
            "copied" => Ok(DomainStatus::Copied),
            other => Err(format!("unknown status '{other}' (expected pending or copied)")),
        }
    }
}

/// A persisted domain entry.
///
/// `id` and `created_at` are fixed at creation. `url` is not enforced unique
/// across a collection; uniqueness is only checked when a batch is analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    // Older snapshots were written before statuses existed.
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: DomainStatus,
}

impl DomainRecord {
    /// Creates a fresh `pending` record with a new id, stamped now.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timestamp(url, Utc::now())
    }

    pub fn with_timestamp(url: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            url: url.into(),
            created_at,
            status: DomainStatus::Pending,
        }
    }
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

fn status_or_pending<'de, D>(deserializer: D) -> Result<DomainStatus, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(DomainStatus::Pending),
        Some(raw) if raw.is_empty() => Ok(DomainStatus::Pending),
        Some(raw) => raw.parse().map_err(serde::de::Error::custom),
    }
}
