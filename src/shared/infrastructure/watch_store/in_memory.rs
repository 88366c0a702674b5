// In memory implementation of the WatchStore port.
//
// Purpose
// - Support handler tests and local runs without touching the disk.
//
// Responsibilities
// - Keep records in an ordered map behind one lock so every batch is atomic.
// - Simulate an offline backend, a backend that rejects writes, or one that rejects deletes.

use crate::modules::artist_watch::core::creator::{CreatorId, WatchedCreator};
use crate::shared::infrastructure::watch_store::{
    MembershipWrite, StoreError, WatchStore, insert_absent, remove_ids,
};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryWatchStore {
    records: RwLock<BTreeMap<CreatorId, WatchedCreator>>,
    offline: bool,
    read_only: bool,
    reject_deletes: bool,
}

impl InMemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = WatchedCreator>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    pub fn toggle_read_only(&mut self) {
        self.read_only = !self.read_only;
    }

    pub fn toggle_reject_deletes(&mut self) {
        self.reject_deletes = !self.reject_deletes;
    }

    pub async fn get(&self, id: CreatorId) -> Option<WatchedCreator> {
        self.records.read().await.get(&id).cloned()
    }

    fn ensure_readable(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("Watch store offline".into()));
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), StoreError> {
        self.ensure_readable()?;
        if self.read_only {
            return Err(StoreError::Backend("Watch store rejected the write".into()));
        }
        Ok(())
    }

    fn ensure_deletable(&self, ids: &BTreeSet<CreatorId>) -> Result<(), StoreError> {
        self.ensure_writable()?;
        if self.reject_deletes && !ids.is_empty() {
            return Err(StoreError::Backend("Watch store rejected the delete".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl WatchStore for InMemoryWatchStore {
    async fn list_all(&self) -> Result<Vec<WatchedCreator>, StoreError> {
        self.ensure_readable()?;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn update_counts(&self, records: &[WatchedCreator]) -> Result<usize, StoreError> {
        self.ensure_writable()?;
        let mut guard = self.records.write().await;
        let mut written = 0;
        for record in records {
            if let Some(stored) = guard.get_mut(&record.id) {
                *stored = record.clone();
                written += 1;
            }
        }
        Ok(written)
    }

    async fn insert_missing(&self, records: &[WatchedCreator]) -> Result<usize, StoreError> {
        self.ensure_writable()?;
        Ok(insert_absent(&mut *self.records.write().await, records))
    }

    async fn delete_many(&self, ids: &BTreeSet<CreatorId>) -> Result<usize, StoreError> {
        self.ensure_deletable(ids)?;
        Ok(remove_ids(&mut *self.records.write().await, ids))
    }

    async fn apply_membership(
        &self,
        inserts: &[WatchedCreator],
        removals: &BTreeSet<CreatorId>,
    ) -> Result<MembershipWrite, StoreError> {
        self.ensure_writable()?;
        self.ensure_deletable(removals)?;
        let mut guard = self.records.write().await;
        Ok(MembershipWrite {
            inserted: insert_absent(&mut guard, inserts),
            removed: remove_ids(&mut guard, removals),
        })
    }
}
