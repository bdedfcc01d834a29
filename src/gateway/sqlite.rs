use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, Result as SqliteResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use super::{MissingDataPolicy, SyncError, SyncGateway};
use crate::record::{DomainRecord, DomainStatus};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS domains (
    position   INTEGER PRIMARY KEY,
    id         TEXT NOT NULL,
    url        TEXT NOT NULL,
    created_at TEXT NOT NULL,
    status     TEXT
);
";

/// Raw row before timestamp and status are validated.
struct DomainRow {
    id: String,
    url: String,
    created_at: String,
    status: Option<String>,
}

impl TryFrom<DomainRow> for DomainRecord {
    type Error = SyncError;

    fn try_from(row: DomainRow) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| SyncError::InvalidRecord {
                id: row.id.clone(),
                reason: format!("bad created_at '{}': {}", row.created_at, e),
            })?
            .with_timezone(&Utc);

        let status = match row.status.as_deref() {
            None | Some("") => DomainStatus::Pending,
            Some(raw) => raw
                .parse::<DomainStatus>()
                .map_err(|reason| SyncError::InvalidRecord {
                    id: row.id.clone(),
                    reason,
                })?,
        };

        Ok(DomainRecord {
            id: row.id,
            url: row.url,
            created_at,
            status,
        })
    }
}

/// Stores the collection in a SQLite database, one row per record.
///
/// `position` keeps stored order; a save rewrites every row inside one
/// transaction.
pub struct SqliteGateway {
    path: PathBuf,
    on_missing: MissingDataPolicy,
}

impl SqliteGateway {
    pub fn new(path: impl Into<PathBuf>, on_missing: MissingDataPolicy) -> Self {
        Self {
            path: path.into(),
            on_missing,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn has_table(conn: &Connection) -> SqliteResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'domains'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl SyncGateway for SqliteGateway {
    fn fetch_all(&self) -> Result<Vec<DomainRecord>, SyncError> {
        let start_time = Instant::now();

        // Opening without CREATE keeps a fetch from leaving an empty database behind.
        let conn = match Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
            Ok(conn) => conn,
            Err(_) if !self.path.exists() => {
                info!(action = "fetch", component = "sqlite_store", path = ?self.path, policy = ?self.on_missing, "No stored collection yet");
                return self.on_missing.resolve(&self.path);
            }
            Err(e) => return Err(e.into()),
        };

        if !Self::has_table(&conn)? {
            info!(action = "fetch", component = "sqlite_store", path = ?self.path, policy = ?self.on_missing, "Database has no domains table");
            return self.on_missing.resolve(&self.path);
        }

        let rows: Vec<DomainRow> = conn
            .prepare("SELECT id, url, created_at, status FROM domains ORDER BY position")?
            .query_map([], |row| {
                Ok(DomainRow {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    created_at: row.get(2)?,
                    status: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<DomainRow>>>()?;

        let records = rows
            .into_iter()
            .map(DomainRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            action = "fetch",
            component = "sqlite_store",
            path = ?self.path,
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Fetched collection"
        );
        Ok(records)
    }

    fn save_all(&self, records: &[DomainRecord]) -> Result<(), SyncError> {
        let start_time = Instant::now();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM domains", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO domains (position, id, url, created_at, status) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, record) in records.iter().enumerate() {
                insert.execute(params![
                    position as i64,
                    record.id,
                    record.url,
                    record.created_at.to_rfc3339(),
                    record.status.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        info!(
            action = "save",
            component = "sqlite_store",
            path = ?self.path,
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Saved collection"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
