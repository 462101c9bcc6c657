//! JSON-backed memo store.
//!
//! One flat key-value document on disk, rewritten on every mutation.
//! Keys are kept sorted so `!memo.list` output is stable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use pomobot_common::StoreError;

pub struct MemoStore {
    path: PathBuf,
    memos: RwLock<BTreeMap<String, String>>,
}

impl MemoStore {
    /// Open a store at `path`, loading the existing document if any.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let memos = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StoreError::Parse(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::Read(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        Ok(Self {
            path,
            memos: RwLock::new(memos),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.memos.read().unwrap().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.memos
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.persist()
    }

    /// Remove a memo, returning the previous value if it existed.
    pub fn remove(&self, key: &str) -> Result<Option<String>, StoreError> {
        let previous = self.memos.write().unwrap().remove(key);
        if previous.is_some() {
            self.persist()?;
        }
        Ok(previous)
    }

    /// All memos in key order.
    pub fn list(&self) -> Vec<(String, String)> {
        self.memos
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.read().unwrap().is_empty()
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Write(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let content = serde_json::to_string_pretty(&*self.memos.read().unwrap())
            .map_err(|e| StoreError::Write(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Write(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}
