use chrono::{DateTime, Utc};

use crate::record::{DomainRecord, DomainStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub pending: usize,
    pub copied: usize,
    /// Rounded share of copied records, 0 for an empty collection.
    pub copied_percent: u32,
}

impl CollectionStats {
    pub fn from_records(records: &[DomainRecord]) -> Self {
        let total = records.len();
        let copied = records
            .iter()
            .filter(|record| record.status == DomainStatus::Copied)
            .count();
        let copied_percent = if total > 0 {
            ((copied as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        Self {
            total,
            pending: total - copied,
            copied,
            copied_percent,
        }
    }
}

/// Outcome of one import: what was appended, what was skipped as duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub total: usize,
    pub added: usize,
    pub skipped: usize,
    pub last_sync: Option<DateTime<Utc>>,
}
