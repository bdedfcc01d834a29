//! Application state for one working session.
//!
//! [`Session`] owns the live collection, the pending analysis and the
//! unsaved-changes flag. Pure transforms live in [`crate::collection`] and
//! [`crate::analysis`]; the session decides when a gateway write happens.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::{debug, error, info, warn};

use crate::analysis::{analyze, Analysis, AnalysisColumn};
use crate::collection::DomainCollection;
use crate::gateway::{SyncError, SyncGateway};
use crate::record::DomainStatus;
use crate::stats::CollectionStats;

/// When status changes reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SavePolicy {
    /// Only an explicit sync writes.
    Manual,
    /// A status change saves the whole collection straight away.
    #[default]
    OnStatusChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing message produced by a session action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

pub struct Session {
    gateway: Box<dyn SyncGateway>,
    collection: DomainCollection,
    analysis: Analysis,
    unsaved: bool,
    save_policy: SavePolicy,
    last_sync: Option<DateTime<Utc>>,
    notices: Vec<Notice>,
}

impl Session {
    /// Fetches the stored collection once and starts a clean session on it.
    pub fn load(
        gateway: Box<dyn SyncGateway>,
        save_policy: SavePolicy,
    ) -> Result<Self, SyncError> {
        let records = gateway.fetch_all().inspect_err(|e| {
            error!(action = "fetch", component = "session", store = gateway.describe(), error = %e, "Failed to load domains");
        })?;
        info!(action = "load", component = "session", store = gateway.describe(), record_count = records.len(), "Session loaded");

        Ok(Self {
            gateway,
            collection: DomainCollection::new(records),
            analysis: Analysis::default(),
            unsaved: false,
            save_policy,
            last_sync: None,
            notices: Vec::new(),
        })
    }

    pub fn collection(&self) -> &DomainCollection {
        &self.collection
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats::from_records(self.collection.records())
    }

    pub fn store(&self) -> String {
        self.gateway.describe()
    }

    /// Drains the notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            message: message.into(),
        });
    }

    /// Replaces the current analysis with a fresh one of `input`.
    pub fn analyze(&mut self, input: &str) -> &Analysis {
        self.analysis = analyze(input, self.collection.records());
        if !self.analysis.is_empty() {
            self.notify(NoticeKind::Success, "Analysis complete");
        }
        &self.analysis
    }

    pub fn update_analysis_item(
        &mut self,
        column: AnalysisColumn,
        index: usize,
        value: impl Into<String>,
    ) -> bool {
        self.analysis.update_item(column, index, value)
    }

    pub fn remove_analysis_item(&mut self, column: AnalysisColumn, index: usize) -> Option<String> {
        self.analysis.remove_item(column, index)
    }

    pub fn clear_analysis_column(&mut self, column: AnalysisColumn) {
        self.analysis.clear_column(column);
    }

    /// Appends the reviewed unique column; see [`DomainCollection::append_unique`].
    pub fn append_unique(&mut self) -> usize {
        let added = self.collection.append_unique(&mut self.analysis);
        if added > 0 {
            self.unsaved = true;
            self.notify(NoticeKind::Success, format!("Appended {added} new domains"));
        }
        added
    }

    pub fn remove_domain(&mut self, id: &str) -> bool {
        let removed = self.collection.remove(id);
        if removed {
            self.unsaved = true;
        } else {
            warn!(action = "remove", component = "session", id, "No domain with this id");
        }
        removed
    }

    pub fn update_domain(&mut self, id: &str, url: impl Into<String>) -> bool {
        let updated = self.collection.update_url(id, url);
        if updated {
            self.unsaved = true;
            self.notify(NoticeKind::Success, "Domain updated");
        } else {
            warn!(action = "update", component = "session", id, "No domain with this id");
        }
        updated
    }

    /// Changes one record's status, then applies the save policy.
    ///
    /// Under [`SavePolicy::OnStatusChange`] the whole collection is written,
    /// including any other unsaved edits. A failed write leaves the session
    /// dirty so a later sync can retry.
    pub fn set_status(&mut self, id: &str, status: DomainStatus) -> Result<bool, SyncError> {
        if !self.collection.set_status(id, status) {
            warn!(action = "set_status", component = "session", id, "No domain with this id");
            return Ok(false);
        }
        self.unsaved = true;

        if self.save_policy == SavePolicy::OnStatusChange {
            self.sync()?;
        }
        Ok(true)
    }

    /// Marks every record matching `ids` with `status` and saves at most once.
    pub fn set_status_many<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a str>,
        status: DomainStatus,
    ) -> Result<usize, SyncError> {
        let changed = ids
            .into_iter()
            .filter(|id| self.collection.set_status(id, status))
            .count();
        if changed == 0 {
            return Ok(0);
        }
        self.unsaved = true;

        if self.save_policy == SavePolicy::OnStatusChange {
            self.sync()?;
        }
        Ok(changed)
    }

    /// Writes the full collection snapshot through the gateway.
    pub fn sync(&mut self) -> Result<(), SyncError> {
        let store = self.gateway.describe();
        match self.gateway.save_all(self.collection.records()) {
            Ok(()) => {
                self.unsaved = false;
                self.last_sync = Some(Utc::now());
                info!(action = "sync", component = "session", store, record_count = self.collection.len(), "Collection synced");
                self.notify(NoticeKind::Success, format!("Successfully synced to {store}"));
                Ok(())
            }
            Err(e) => {
                self.unsaved = true;
                error!(action = "sync", component = "session", store, error = %e, "Failed to sync collection");
                self.notify(NoticeKind::Error, format!("Failed to sync: {e}"));
                Err(e)
            }
        }
    }

    /// Syncs only when something changed since the last successful write.
    pub fn sync_if_dirty(&mut self) -> Result<bool, SyncError> {
        if !self.unsaved {
            debug!(action = "sync", component = "session", store = self.gateway.describe(), "Nothing to sync");
            return Ok(false);
        }
        self.sync().map(|()| true)
    }
}
