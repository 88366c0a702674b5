use crate::modules::artist_watch::core::creator::CreatorId;
use crate::shared::infrastructure::seed_list::SeedList;
use crate::shared::infrastructure::watch_store::StoreError;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemorySeedList {
    seeds: Mutex<Vec<CreatorId>>,
    offline: bool,
}

impl InMemorySeedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seeds(seeds: impl IntoIterator<Item = CreatorId>) -> Self {
        let mut unique = Vec::new();
        for seed in seeds {
            if !unique.contains(&seed) {
                unique.push(seed);
            }
        }
        Self {
            seeds: Mutex::new(unique),
            offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("Seed list offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SeedList for InMemorySeedList {
    async fn list(&self) -> Result<Vec<CreatorId>, StoreError> {
        self.ensure_online()?;
        Ok(self.seeds.lock().await.clone())
    }

    async fn add(&self, id: CreatorId) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut seeds = self.seeds.lock().await;
        if seeds.contains(&id) {
            return Ok(false);
        }
        seeds.push(id);
        Ok(true)
    }

    async fn remove(&self, id: CreatorId) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut seeds = self.seeds.lock().await;
        let before = seeds.len();
        seeds.retain(|seed| *seed != id);
        Ok(seeds.len() != before)
    }
}
