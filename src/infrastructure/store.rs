//! # File-backed User Store
//!
//! Persists user records as a single JSON document (`data/users.json`)
//! behind an async mutex. Every `put` rewrites the document through a
//! temp-file rename, which gives the atomic single-key overwrite the poll
//! cycle relies on. Suitable for the fleet sizes a personal bot sees.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::traits::{StoreError, UserStore};
use crate::domain::types::UserRecord;

pub struct FileUserStore {
    path: PathBuf,
    records: Mutex<HashMap<i64, UserRecord>>,
}

impl FileUserStore {
    /// Loads the store from `path`, creating an empty one if the file does
    /// not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let on_disk: HashMap<String, UserRecord> = serde_json::from_str(&content)?;
            on_disk.into_values().map(|r| (r.id, r)).collect()
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn flush(&self, records: &HashMap<i64, UserRecord>) -> Result<(), StoreError> {
        let on_disk: HashMap<String, &UserRecord> =
            records.iter().map(|(id, r)| (id.to_string(), r)).collect();
        let content = serde_json::to_string_pretty(&on_disk)?;

        // Write-then-rename keeps a crash from truncating the document.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn get(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn put(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        records.insert(record.id, record.clone());
        self.flush(&records)
    }
}
