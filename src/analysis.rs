use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;
use tracing::info;

use crate::domain::normalize_line;
use crate::record::DomainRecord;

/// One of the two review columns of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisColumn {
    Unique,
    Duplicates,
}

impl fmt::Display for AnalysisColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisColumn::Unique => f.write_str("unique"),
            AnalysisColumn::Duplicates => f.write_str("duplicates"),
        }
    }
}

/// Transient unique/duplicate partition of one pasted batch.
///
/// Both columns stay editable until the unique column is appended. Edits are
/// never re-classified against the other column or the stored collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub unique: Vec<String>,
    pub duplicates: Vec<String>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.unique.is_empty() && self.duplicates.is_empty()
    }

    pub fn column(&self, column: AnalysisColumn) -> &[String] {
        match column {
            AnalysisColumn::Unique => &self.unique,
            AnalysisColumn::Duplicates => &self.duplicates,
        }
    }

    fn column_mut(&mut self, column: AnalysisColumn) -> &mut Vec<String> {
        match column {
            AnalysisColumn::Unique => &mut self.unique,
            AnalysisColumn::Duplicates => &mut self.duplicates,
        }
    }

    /// Replaces the entry at `index`. Out-of-range indexes are ignored.
    pub fn update_item(
        &mut self,
        column: AnalysisColumn,
        index: usize,
        value: impl Into<String>,
    ) -> bool {
        match self.column_mut(column).get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Removes the entry at `index`, shifting later entries down.
    pub fn remove_item(&mut self, column: AnalysisColumn, index: usize) -> Option<String> {
        let items = self.column_mut(column);
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    pub fn clear_column(&mut self, column: AnalysisColumn) {
        self.column_mut(column).clear();
    }

    /// Empties both columns and hands back what was there.
    pub fn take(&mut self) -> Analysis {
        std::mem::take(self)
    }
}

/// Partitions pasted text into new unique domains and duplicates.
///
/// Lines are normalized in parallel on the global rayon pool; classification
/// then runs in input order so the first occurrence of a value is the one
/// kept as unique. A value already present in `existing` is a duplicate
/// every time it appears. Lines that normalize to nothing are dropped.
pub fn analyze(input: &str, existing: &[DomainRecord]) -> Analysis {
    let start_time = Instant::now();

    let lines: Vec<&str> = input.split(['\n', '\r']).collect();
    let normalized: Vec<Option<String>> = lines
        .par_iter()
        .map(|line| normalize_line(line))
        .collect();

    let existing_urls: HashSet<&str> = existing
        .iter()
        .map(|record| record.url.as_str())
        .collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut analysis = Analysis::default();

    for domain in normalized.into_iter().flatten() {
        if existing_urls.contains(domain.as_str()) || seen.contains(&domain) {
            analysis.duplicates.push(domain);
        } else {
            seen.insert(domain.clone());
            analysis.unique.push(domain);
        }
    }

    info!(
        action = "complete",
        component = "analyzer",
        line_count = lines.len(),
        existing_count = existing.len(),
        unique = analysis.unique.len(),
        duplicates = analysis.duplicates.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Analysis completed"
    );

    analysis
}
