//! Persistence boundary for the domain collection.
//!
//! A gateway only knows two operations: read the whole collection and replace
//! the whole collection. There is no incremental update and no merge; the
//! snapshot handed to [`SyncGateway::save_all`] becomes the stored state.

pub mod json_blob;
pub mod sqlite;

use clap::ValueEnum;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::record::DomainRecord;

pub use json_blob::JsonBlobGateway;
pub use sqlite::SqliteGateway;

/// Errors from fetching or saving a collection.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no stored collection at {0}")]
    NotFound(PathBuf),

    #[error("stored document at {0} is not a JSON array")]
    NotAnArray(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },
}

/// What a fetch does when the store holds no collection yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MissingDataPolicy {
    /// Treat absence as an empty collection.
    #[default]
    Empty,
    /// Report absence as [`SyncError::NotFound`].
    Fail,
}

impl MissingDataPolicy {
    pub(crate) fn resolve(self, path: &Path) -> Result<Vec<DomainRecord>, SyncError> {
        match self {
            MissingDataPolicy::Empty => Ok(Vec::new()),
            MissingDataPolicy::Fail => Err(SyncError::NotFound(path.to_path_buf())),
        }
    }
}

/// Whole-collection persistence.
pub trait SyncGateway {
    /// Returns the stored collection in stored order.
    ///
    /// Records stored without a status come back as `pending`.
    fn fetch_all(&self) -> Result<Vec<DomainRecord>, SyncError>;

    /// Replaces the stored collection with `records`. Either every record is
    /// written or the previous state is kept.
    fn save_all(&self, records: &[DomainRecord]) -> Result<(), SyncError>;

    /// Short human-readable location used in logs and notices.
    fn describe(&self) -> String;
}

/// Storage backends selectable at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// A single JSON array document.
    #[default]
    Json,
    /// One SQLite row per record.
    Sqlite,
}

impl Backend {
    pub fn default_store(&self) -> PathBuf {
        match self {
            Backend::Json => PathBuf::from("domains.json"),
            Backend::Sqlite => PathBuf::from("domains.db"),
        }
    }
}

/// Builds the gateway for `backend` rooted at `path`.
pub fn open_gateway(
    backend: Backend,
    path: impl Into<PathBuf>,
    on_missing: MissingDataPolicy,
) -> Box<dyn SyncGateway> {
    match backend {
        Backend::Json => Box::new(JsonBlobGateway::new(path, on_missing)),
        Backend::Sqlite => Box::new(SqliteGateway::new(path, on_missing)),
    }
}
