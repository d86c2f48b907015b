//! Session snapshot persistence.
//!
//! The form state is mirrored into a single JSON file under a fixed key so
//! that a later session can pick up where the last one stopped. Snapshots
//! expire one year after they were written; expired or unreadable snapshots
//! are treated as absent.

use std::path::{Path, PathBuf};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::record::ReportRecord;

/// Fixed key the snapshot is stored under.
pub const SESSION_KEY: &str = "reportFormData";

/// Snapshot lifetime.
pub const SESSION_TTL: SignedDuration = SignedDuration::from_hours(24 * 365);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub saved_at: Timestamp,
    pub expires_at: Timestamp,
    pub record: ReportRecord,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// A store keeping its snapshot in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<ReportRecord>, CoreError> {
        self.load_at(Timestamp::now())
    }

    /// Load the snapshot as seen at `now`.
    pub fn load_at(&self, now: Timestamp) -> Result<Option<ReportRecord>, CoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| CoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let snapshot: SessionSnapshot = match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session snapshot");
                return Ok(None);
            }
        };

        if snapshot.expires_at <= now {
            tracing::warn!(
                path = %self.path.display(),
                expires_at = %snapshot.expires_at,
                "ignoring expired session snapshot"
            );
            return Ok(None);
        }

        Ok(Some(snapshot.record))
    }

    pub fn save(&self, record: &ReportRecord) -> Result<(), CoreError> {
        self.save_at(record, Timestamp::now())
    }

    /// Write the snapshot stamped with `now`.
    pub fn save_at(&self, record: &ReportRecord, now: Timestamp) -> Result<(), CoreError> {
        let io_err = |source| CoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }

        let snapshot = SessionSnapshot {
            saved_at: now,
            expires_at: now.checked_add(SESSION_TTL).unwrap_or(Timestamp::MAX),
            record: record.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        // Write to a temp file then rename for atomicity
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes()).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "session snapshot saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), CoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|source| CoreError::Io {
                path: self.path.clone(),
                source,
            })?;
            tracing::info!(path = %self.path.display(), "session snapshot cleared");
        }
        Ok(())
    }
}
