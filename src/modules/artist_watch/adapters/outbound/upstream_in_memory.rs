// In memory implementation of the UpstreamGateway port.
//
// Purpose
// - Drive poll and reconciliation tests with scripted snapshots and follow lists.
//
// Responsibilities
// - Serve snapshots and follow lists set by the test.
// - Fail on demand for chosen creators.
// - Record call counts and the peak number of concurrent calls.

use crate::modules::artist_watch::adapters::outbound::upstream::{UpstreamError, UpstreamGateway};
use crate::modules::artist_watch::core::creator::CreatorId;
use crate::modules::artist_watch::core::snapshot::FetchedSnapshot;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryUpstream {
    snapshots: RwLock<HashMap<CreatorId, FetchedSnapshot>>,
    follows: RwLock<HashMap<CreatorId, Vec<CreatorId>>>,
    failing: RwLock<HashSet<CreatorId>>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    snapshot_calls: AtomicUsize,
    follow_calls: AtomicUsize,
}

impl InMemoryUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds every call open for `delay`, so concurrent calls overlap.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub async fn set_snapshot(&self, snapshot: FetchedSnapshot) {
        self.snapshots
            .write()
            .await
            .insert(snapshot.creator_id, snapshot);
    }

    pub async fn set_follows(&self, id: CreatorId, follows: impl IntoIterator<Item = CreatorId>) {
        self.follows
            .write()
            .await
            .insert(id, follows.into_iter().collect());
    }

    pub async fn fail_for(&self, id: CreatorId) {
        self.failing.write().await.insert(id);
    }

    pub async fn recover(&self, id: CreatorId) {
        self.failing.write().await.remove(&id);
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    pub fn follow_calls(&self) -> usize {
        self.follow_calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, id: CreatorId, resource: &str) -> Result<(), UpstreamError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.read().await.contains(&id) {
            return Err(UpstreamError::Status {
                resource: format!("{resource} {id}"),
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl UpstreamGateway for InMemoryUpstream {
    async fn fetch_creator_snapshot(&self, id: CreatorId) -> Result<FetchedSnapshot, UpstreamError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(id, "profile").await?;
        self.snapshots
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| UpstreamError::Status {
                resource: format!("profile {id}"),
                status: 404,
            })
    }

    async fn fetch_follow_list(&self, id: CreatorId) -> Result<Vec<CreatorId>, UpstreamError> {
        self.follow_calls.fetch_add(1, Ordering::SeqCst);
        self.enter(id, "following").await?;
        Ok(self
            .follows
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}
