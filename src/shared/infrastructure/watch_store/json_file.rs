// JSON file implementation of the WatchStore port.
//
// Responsibilities
// - Keep all records in one JSON document.
// - Apply every batch by writing a sibling temp file and renaming it over the document,
//   so a crash leaves either the old or the new document behind.

use crate::modules::artist_watch::core::creator::{CreatorId, WatchedCreator};
use crate::shared::infrastructure::watch_store::{
    MembershipWrite, StoreError, WatchStore, insert_absent, remove_ids,
};
use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

type Records = BTreeMap<CreatorId, WatchedCreator>;

pub struct JsonFileWatchStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileWatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Records, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Records::new()),
            Err(err) => return Err(err.into()),
        };
        let rows: Vec<WatchedCreator> = serde_json::from_slice(&bytes)?;
        Ok(rows.into_iter().map(|r| (r.id, r)).collect())
    }

    async fn persist(&self, records: &Records) -> Result<(), StoreError> {
        let rows: Vec<&WatchedCreator> = records.values().collect();
        let bytes = serde_json::to_vec_pretty(&rows)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Loads, mutates and persists under the lock. Nothing is written when `mutate` changes nothing.
    async fn modify<F>(&self, mutate: F) -> Result<usize, StoreError>
    where
        F: FnOnce(&mut Records) -> usize + Send,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let changed = mutate(&mut records);
        if changed > 0 {
            self.persist(&records).await?;
        }
        Ok(changed)
    }
}

#[async_trait::async_trait]
impl WatchStore for JsonFileWatchStore {
    async fn list_all(&self) -> Result<Vec<WatchedCreator>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_values().collect())
    }

    async fn update_counts(&self, records: &[WatchedCreator]) -> Result<usize, StoreError> {
        self.modify(|stored| {
            records
                .iter()
                .filter_map(|record| stored.get_mut(&record.id).map(|slot| *slot = record.clone()))
                .count()
        })
        .await
    }

    async fn insert_missing(&self, records: &[WatchedCreator]) -> Result<usize, StoreError> {
        self.modify(|stored| insert_absent(stored, records)).await
    }

    async fn delete_many(&self, ids: &BTreeSet<CreatorId>) -> Result<usize, StoreError> {
        self.modify(|stored| remove_ids(stored, ids)).await
    }

    async fn apply_membership(
        &self,
        inserts: &[WatchedCreator],
        removals: &BTreeSet<CreatorId>,
    ) -> Result<MembershipWrite, StoreError> {
        let mut written = MembershipWrite::default();
        self.modify(|stored| {
            written.inserted = insert_absent(stored, inserts);
            written.removed = remove_ids(stored, removals);
            written.inserted + written.removed
        })
        .await?;
        Ok(written)
    }
}
