use crate::modules::artist_watch::core::creator::CreatorId;
use crate::shared::infrastructure::watch_store::StoreError;
use async_trait::async_trait;

/// Persisted list of seed creators whose follow lists derive the watch set.
#[async_trait]
pub trait SeedList: Send + Sync {
    /// Seeds in insertion order.
    async fn list(&self) -> Result<Vec<CreatorId>, StoreError>;

    /// Returns `false` when `id` already is a seed.
    async fn add(&self, id: CreatorId) -> Result<bool, StoreError>;

    /// Returns `false` when `id` is not a seed.
    async fn remove(&self, id: CreatorId) -> Result<bool, StoreError>;
}

pub mod in_memory;
pub mod json_file;
