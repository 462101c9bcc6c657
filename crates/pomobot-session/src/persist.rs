//! Pluggable persistence for the session start timestamp.
//!
//! The start timestamp is the only state worth surviving a restart;
//! cycle number and position are re-derived from it. Persistence is a
//! trait so the engine never knows where the value lives.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pomobot_common::StoreError;
use serde::{Deserialize, Serialize};

pub trait StartedAtStore: Send + Sync {
    fn load(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
    fn save(&self, started_at: Option<DateTime<Utc>>) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    started_at: Option<DateTime<Utc>>,
}

/// Single-field JSON document on disk. A missing file means no active
/// session.
#[derive(Debug, Clone)]
pub struct JsonStartedAtStore {
    path: PathBuf,
}

impl JsonStartedAtStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StartedAtStore for JsonStartedAtStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Read(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let stored: StoredSession = serde_json::from_str(&content)
            .map_err(|e| StoreError::Parse(format!("{}: {e}", self.path.display())))?;
        Ok(stored.started_at)
    }

    fn save(&self, started_at: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Write(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let stored = StoredSession { started_at };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Write(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}
