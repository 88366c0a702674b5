use crate::modules::artist_watch::core::creator::CreatorId;
use crate::shared::infrastructure::seed_list::SeedList;
use crate::shared::infrastructure::watch_store::StoreError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Seed list kept as a JSON array of creator ids, rewritten through a temp file on change.
pub struct JsonFileSeedList {
    path: PathBuf,
    seeds: Mutex<Vec<CreatorId>>,
}

impl JsonFileSeedList {
    /// Opens the list at `path`, writing `initial` there when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>, initial: Vec<CreatorId>) -> Result<Self, StoreError> {
        let path = path.into();
        let seeds = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let mut unique: Vec<CreatorId> = Vec::with_capacity(initial.len());
                for seed in initial {
                    if !unique.contains(&seed) {
                        unique.push(seed);
                    }
                }
                persist(&path, &unique).await?;
                unique
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            seeds: Mutex::new(seeds),
        })
    }
}

async fn persist(path: &Path, seeds: &[CreatorId]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec(seeds)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait::async_trait]
impl SeedList for JsonFileSeedList {
    async fn list(&self) -> Result<Vec<CreatorId>, StoreError> {
        Ok(self.seeds.lock().await.clone())
    }

    async fn add(&self, id: CreatorId) -> Result<bool, StoreError> {
        let mut seeds = self.seeds.lock().await;
        if seeds.contains(&id) {
            return Ok(false);
        }
        let mut next = seeds.clone();
        next.push(id);
        persist(&self.path, &next).await?;
        *seeds = next;
        Ok(true)
    }

    async fn remove(&self, id: CreatorId) -> Result<bool, StoreError> {
        let mut seeds = self.seeds.lock().await;
        if !seeds.contains(&id) {
            return Ok(false);
        }
        let next: Vec<CreatorId> = seeds.iter().copied().filter(|seed| *seed != id).collect();
        persist(&self.path, &next).await?;
        *seeds = next;
        Ok(true)
    }
}
