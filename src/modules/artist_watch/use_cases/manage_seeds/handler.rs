use crate::modules::artist_watch::adapters::outbound::upstream::UpstreamGateway;
use crate::modules::artist_watch::core::creator::CreatorId;
use crate::modules::artist_watch::use_cases::errors::CycleError;
use crate::modules::artist_watch::use_cases::reconcile_watch_set::handler::{
    ReconcileReport, ReconcileWatchSetHandler,
};
use crate::shared::infrastructure::seed_list::SeedList;
use crate::shared::infrastructure::watch_store::{StoreError, WatchStore};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("creator {0} is already a seed")]
    AlreadyWatched(CreatorId),

    #[error("creator {0} is not a seed")]
    NotWatched(CreatorId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Operator commands that change the seed list and immediately reconcile.
pub struct ManageSeedsHandler<TStore, TSeeds, TUpstream>
where
    TStore: WatchStore + ?Sized,
    TSeeds: SeedList + ?Sized,
    TUpstream: UpstreamGateway + ?Sized,
{
    seeds: Arc<TSeeds>,
    reconcile: Arc<ReconcileWatchSetHandler<TStore, TSeeds, TUpstream>>,
}

impl<TStore, TSeeds, TUpstream> ManageSeedsHandler<TStore, TSeeds, TUpstream>
where
    TStore: WatchStore + ?Sized,
    TSeeds: SeedList + ?Sized,
    TUpstream: UpstreamGateway + ?Sized,
{
    pub fn new(
        seeds: Arc<TSeeds>,
        reconcile: Arc<ReconcileWatchSetHandler<TStore, TSeeds, TUpstream>>,
    ) -> Self {
        Self { seeds, reconcile }
    }

    pub async fn list(&self) -> Result<Vec<CreatorId>, SeedError> {
        Ok(self.seeds.list().await?)
    }

    /// The seed stays added even if the follow-up reconciliation fails; the
    /// next scheduled reconciliation picks it up.
    pub async fn watch(&self, id: CreatorId) -> Result<ReconcileReport, SeedError> {
        if !self.seeds.add(id).await? {
            return Err(SeedError::AlreadyWatched(id));
        }
        tracing::info!(creator_id = %id, "seed added");
        Ok(self.reconcile.run().await?)
    }

    pub async fn unwatch(&self, id: CreatorId) -> Result<ReconcileReport, SeedError> {
        if !self.seeds.remove(id).await? {
            return Err(SeedError::NotWatched(id));
        }
        tracing::info!(creator_id = %id, "seed removed");
        Ok(self.reconcile.run().await?)
    }
}

#[cfg(test)]
mod manage_seeds_handler_tests {
    use super::*;
    use crate::modules::artist_watch::adapters::outbound::upstream_in_memory::InMemoryUpstream;
    use crate::modules::artist_watch::core::settings::WatchSettings;
    use crate::shared::infrastructure::seed_list::in_memory::InMemorySeedList;
    use crate::shared::infrastructure::watch_store::in_memory::InMemoryWatchStore;
    use crate::tests::fixtures::snapshots::SnapshotBuilder;
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;

    type Handler = ManageSeedsHandler<InMemoryWatchStore, InMemorySeedList, InMemoryUpstream>;

    #[fixture]
    async fn before_each() -> (Arc<InMemoryWatchStore>, Arc<InMemoryUpstream>, Handler) {
        let store = Arc::new(InMemoryWatchStore::new());
        let seeds = Arc::new(InMemorySeedList::with_seeds([CreatorId(1)]));
        let upstream = Arc::new(InMemoryUpstream::new());
        upstream.set_follows(CreatorId(1), [CreatorId(11)]).await;
        upstream.set_follows(CreatorId(2), [CreatorId(21), CreatorId(11)]).await;
        for id in [11, 21] {
            upstream
                .set_snapshot(SnapshotBuilder::new(id).totals(3, 1).build())
                .await;
        }
        let reconcile = Arc::new(ReconcileWatchSetHandler::new(
            WatchSettings::default(),
            store.clone(),
            seeds.clone(),
            upstream.clone(),
        ));
        (store, upstream, ManageSeedsHandler::new(seeds, reconcile))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_add_a_seed_and_import_its_follows(
        #[future] before_each: (Arc<InMemoryWatchStore>, Arc<InMemoryUpstream>, Handler),
    ) {
        let (store, _, handler) = before_each.await;

        let report = handler.watch(CreatorId(2)).await.expect("watch failed");

        assert_eq!(report.added, vec![CreatorId(11), CreatorId(21)]);
        assert_eq!(handler.list().await.unwrap(), vec![CreatorId(1), CreatorId(2)]);
        assert_eq!(
            store.ids().await.unwrap(),
            BTreeSet::from([CreatorId(11), CreatorId(21)])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_seed_that_is_already_watched(
        #[future] before_each: (Arc<InMemoryWatchStore>, Arc<InMemoryUpstream>, Handler),
    ) {
        let (_, upstream, handler) = before_each.await;

        let result = handler.watch(CreatorId(1)).await;

        assert!(matches!(result, Err(SeedError::AlreadyWatched(CreatorId(1)))));
        assert_eq!(upstream.follow_calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_remove_a_seed_and_drop_creators_only_it_followed(
        #[future] before_each: (Arc<InMemoryWatchStore>, Arc<InMemoryUpstream>, Handler),
    ) {
        let (store, _, handler) = before_each.await;
        handler.watch(CreatorId(2)).await.expect("watch failed");

        let report = handler.unwatch(CreatorId(2)).await.expect("unwatch failed");

        assert_eq!(report.removed, vec![CreatorId(21)]);
        assert_eq!(store.ids().await.unwrap(), BTreeSet::from([CreatorId(11)]));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_removing_an_unknown_seed(
        #[future] before_each: (Arc<InMemoryWatchStore>, Arc<InMemoryUpstream>, Handler),
    ) {
        let (_, _, handler) = before_each.await;
        let result = handler.unwatch(CreatorId(3)).await;
        assert_eq!(result.unwrap_err().to_string(), "creator 3 is not a seed");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_seed_when_reconciliation_fails(
        #[future] before_each: (Arc<InMemoryWatchStore>, Arc<InMemoryUpstream>, Handler),
    ) {
        let (store, upstream, handler) = before_each.await;
        upstream.fail_for(CreatorId(2)).await;

        let result = handler.watch(CreatorId(2)).await;

        assert!(matches!(result, Err(SeedError::Cycle(CycleError::Upstream(_)))));
        assert_eq!(handler.list().await.unwrap(), vec![CreatorId(1), CreatorId(2)]);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
