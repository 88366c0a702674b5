use crate::modules::artist_watch::core::creator::{CreatorId, WatchedCreator};
use async_trait::async_trait;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MembershipWrite {
    pub inserted: usize,
    pub removed: usize,
}

/// Durable creator id -> last observed counts mapping.
///
/// Every batch method is atomic: either the whole batch is applied or none of it.
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// All records, ascending by creator id.
    async fn list_all(&self) -> Result<Vec<WatchedCreator>, StoreError>;

    /// Overwrites the counts of records that still exist. Records deleted in
    /// the meantime are not resurrected. Returns how many were written.
    async fn update_counts(&self, records: &[WatchedCreator]) -> Result<usize, StoreError>;

    /// Inserts records whose id is not stored yet. Returns how many were inserted.
    async fn insert_missing(&self, records: &[WatchedCreator]) -> Result<usize, StoreError>;

    /// Returns how many records were deleted.
    async fn delete_many(&self, ids: &BTreeSet<CreatorId>) -> Result<usize, StoreError>;

    /// `insert_missing` and `delete_many` committed together as one batch.
    async fn apply_membership(
        &self,
        inserts: &[WatchedCreator],
        removals: &BTreeSet<CreatorId>,
    ) -> Result<MembershipWrite, StoreError>;

    async fn ids(&self) -> Result<BTreeSet<CreatorId>, StoreError> {
        Ok(self.list_all().await?.into_iter().map(|c| c.id).collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.list_all().await?.len())
    }
}

pub mod in_memory;
pub mod json_file;

pub(crate) fn insert_absent(
    stored: &mut BTreeMap<CreatorId, WatchedCreator>,
    records: &[WatchedCreator],
) -> usize {
    let mut inserted = 0;
    for record in records {
        if let Entry::Vacant(slot) = stored.entry(record.id) {
            slot.insert(record.clone());
            inserted += 1;
        }
    }
    inserted
}

pub(crate) fn remove_ids(
    stored: &mut BTreeMap<CreatorId, WatchedCreator>,
    ids: &BTreeSet<CreatorId>,
) -> usize {
    ids.iter().filter(|id| stored.remove(*id).is_some()).count()
}
