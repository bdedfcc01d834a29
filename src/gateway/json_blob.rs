use serde_json::Value;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use super::{MissingDataPolicy, SyncError, SyncGateway};
use crate::record::DomainRecord;

/// Stores the collection as one pretty-printed JSON array.
pub struct JsonBlobGateway {
    path: PathBuf,
    on_missing: MissingDataPolicy,
}

impl JsonBlobGateway {
    pub fn new(path: impl Into<PathBuf>, on_missing: MissingDataPolicy) -> Self {
        Self {
            path: path.into(),
            on_missing,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SyncGateway for JsonBlobGateway {
    fn fetch_all(&self) -> Result<Vec<DomainRecord>, SyncError> {
        let start_time = Instant::now();

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(action = "fetch", component = "json_blob", path = ?self.path, policy = ?self.on_missing, "No stored collection yet");
                return self.on_missing.resolve(&self.path);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return self.on_missing.resolve(&self.path);
        }

        let value: Value = serde_json::from_str(&content)?;
        if !value.is_array() {
            return match self.on_missing {
                MissingDataPolicy::Empty => {
                    warn!(action = "fetch", component = "json_blob", path = ?self.path, "Stored document is not an array, treating as empty");
                    Ok(Vec::new())
                }
                MissingDataPolicy::Fail => Err(SyncError::NotAnArray(self.path.clone())),
            };
        }
        let records: Vec<DomainRecord> = serde_json::from_value(value)?;

        info!(
            action = "fetch",
            component = "json_blob",
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

        let body = serde_json::to_string_pretty(records)?;
        let temp_path = self.temp_path();
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        info!(
            action = "save",
            component = "json_blob",
            path = ?self.path,
            record_count = records.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Saved collection"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
