use chrono::Utc;
use tracing::{debug, info};

use crate::analysis::Analysis;
use crate::record::{DomainRecord, DomainStatus};

/// Narrows a collection for listing and export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilter {
    /// Case-insensitive substring matched against `url`.
    pub search: Option<String>,
    /// `None` keeps every status.
    pub status: Option<DomainStatus>,
}

impl DomainFilter {
    pub fn matches(&self, record: &DomainRecord) -> bool {
        let matches_search = match &self.search {
            Some(term) => record.url.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        };
        let matches_status = self.status.map_or(true, |status| record.status == status);
        matches_search && matches_status
    }
}

/// The live set of domain records, most recent first.
///
/// Every mutation addresses records by id and leaves ids untouched; a
/// missing id is a no-op reported through the `bool` return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCollection {
    records: Vec<DomainRecord>,
}

impl DomainCollection {
    pub fn new(records: Vec<DomainRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DomainRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DomainRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DomainRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut DomainRecord> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    /// Consumes the unique column of `analysis` into new `pending` records.
    ///
    /// New records are prepended in column order and share one creation
    /// timestamp. The analysis is reset afterwards, so a second call without
    /// a fresh analysis adds nothing. No uniqueness re-check happens here.
    /// Returns the number of records added.
    pub fn append_unique(&mut self, analysis: &mut Analysis) -> usize {
        if analysis.unique.is_empty() {
            debug!(action = "skip", component = "reconciler", "Nothing to append");
            return 0;
        }

        let batch = analysis.take();
        let created_at = Utc::now();
        let added = batch.unique.len();

        let mut records: Vec<DomainRecord> = batch
            .unique
            .into_iter()
            .map(|url| DomainRecord::with_timestamp(url, created_at))
            .collect();
        records.append(&mut self.records);
        self.records = records;

        info!(
            action = "append",
            component = "reconciler",
            added,
            skipped = batch.duplicates.len(),
            total = self.records.len(),
            "Appended unique domains"
        );
        added
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    /// Replaces the url verbatim; callers trim or normalize beforehand.
    pub fn update_url(&mut self, id: &str, url: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.url = url.into();
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, id: &str, status: DomainStatus) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    pub fn filtered<'a>(
        &'a self,
        filter: &'a DomainFilter,
    ) -> impl Iterator<Item = &'a DomainRecord> {
        self.records.iter().filter(move |record| filter.matches(record))
    }

    /// Newline-joined urls of the matching records, in collection order.
    pub fn export(&self, filter: &DomainFilter) -> String {
        self.filtered(filter)
            .map(|record| record.url.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
