use crate::modules::artist_watch::adapters::outbound::notifier::{Notifier, deliver_all};
use crate::modules::artist_watch::adapters::outbound::upstream::UpstreamGateway;
use crate::modules::artist_watch::core::creator::{CreatorId, NewItem};
use crate::modules::artist_watch::core::delta::compute_delta;
use crate::modules::artist_watch::core::settings::WatchSettings;
use crate::modules::artist_watch::use_cases::errors::CycleError;
use crate::shared::infrastructure::bounded_fetch::BoundedFetch;
use crate::shared::infrastructure::watch_store::WatchStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollReport {
    pub watched: usize,
    pub updated: usize,
    /// Creators whose fetch failed and were left untouched this cycle.
    pub skipped: Vec<CreatorId>,
    pub new_items: Vec<NewItem>,
    pub delivered: usize,
}

/// One refresh pass over every watched creator.
pub struct PollCycleHandler<TStore, TUpstream, TNotifier>
where
    TStore: WatchStore + ?Sized,
    TUpstream: UpstreamGateway + ?Sized,
    TNotifier: Notifier + ?Sized,
{
    store: Arc<TStore>,
    upstream: Arc<TUpstream>,
    notifier: Arc<TNotifier>,
    fetch: BoundedFetch,
    in_progress: Mutex<()>,
}

impl<TStore, TUpstream, TNotifier> PollCycleHandler<TStore, TUpstream, TNotifier>
where
    TStore: WatchStore + ?Sized,
    TUpstream: UpstreamGateway + ?Sized,
    TNotifier: Notifier + ?Sized,
{
    pub fn new(
        settings: WatchSettings,
        store: Arc<TStore>,
        upstream: Arc<TUpstream>,
        notifier: Arc<TNotifier>,
    ) -> Self {
        Self {
            store,
            upstream,
            notifier,
            fetch: settings.bounded_fetch(),
            in_progress: Mutex::new(()),
        }
    }

    /// Fetches, diffs and commits the new counts as a single batch, then hands
    /// the new items to the notifier. Nothing is written when the cycle fails.
    /// Concurrent calls run one after the other, so an item is announced once.
    #[tracing::instrument(name = "poll_cycle", skip(self))]
    pub async fn run(&self) -> Result<PollReport, CycleError> {
        let _running = self.in_progress.lock().await;
        let watched = self.store.list_all().await?;
        let ids: Vec<CreatorId> = watched.iter().map(|c| c.id).collect();
        let upstream = self.upstream.as_ref();
        let outcomes = self
            .fetch
            .run(ids, move |id| {
                upstream.fetch_creator_snapshot(id)
            })
            .await
            .map_err(|aborted| aborted.error)?;

        let mut report = PollReport {
            watched: watched.len(),
            ..PollReport::default()
        };
        let mut updates = Vec::new();
        for (creator, outcome) in watched.iter().zip(outcomes) {
            match outcome {
                Ok(snapshot) => {
                    let delta = compute_delta(creator, &snapshot);
                    report.new_items.extend(delta.new_items);
                    updates.extend(delta.updated);
                }
                Err(error) => {
                    warn!(creator_id = %creator.id, %error, "creator skipped this cycle");
                    report.skipped.push(creator.id);
                }
            }
        }

        if !updates.is_empty() {
            report.updated = self.store.update_counts(&updates).await?;
        }

        report.delivered = deliver_all(self.notifier.as_ref(), &report.new_items).await;
        info!(
            watched = report.watched,
            updated = report.updated,
            skipped = report.skipped.len(),
            new_items = report.new_items.len(),
            delivered = report.delivered,
            "poll cycle finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod poll_cycle_handler_tests {
    use super::*;
    use crate::modules::artist_watch::adapters::outbound::notifier_in_memory::RecordingNotifier;
    use crate::modules::artist_watch::adapters::outbound::upstream::UpstreamError;
    use crate::modules::artist_watch::adapters::outbound::upstream_in_memory::InMemoryUpstream;
    use crate::modules::artist_watch::core::creator::{Category, Counts, WatchedCreator};
    use crate::shared::infrastructure::bounded_fetch::FailurePolicy;
    use crate::shared::infrastructure::watch_store::StoreError;
    use crate::shared::infrastructure::watch_store::in_memory::InMemoryWatchStore;
    use crate::tests::fixtures::snapshots::SnapshotBuilder;
    use rstest::{fixture, rstest};
    use std::num::NonZeroUsize;
    use std::time::Duration;

    type BeforeEachReturn = (InMemoryWatchStore, InMemoryUpstream, RecordingNotifier);

    fn record(id: u64, illust: u64, manga: u64) -> WatchedCreator {
        WatchedCreator::new(CreatorId(id), Counts::new(illust, manga))
    }

    fn isolate() -> WatchSettings {
        WatchSettings {
            failure_policy: FailurePolicy::Isolate,
            ..WatchSettings::default()
        }
    }

    #[fixture]
    async fn before_each() -> BeforeEachReturn {
        let store = InMemoryWatchStore::with_records([record(42, 5, 2), record(7, 1, 0)]);
        let upstream = InMemoryUpstream::new();
        upstream
            .set_snapshot(
                SnapshotBuilder::new(42)
                    .totals(7, 2)
                    .illust_ids(["i7", "i6", "i5", "i4", "i3"])
                    .manga_ids(["m2", "m1"])
                    .build(),
            )
            .await;
        upstream
            .set_snapshot(
                SnapshotBuilder::new(7)
                    .totals(1, 1)
                    .illust_ids(["a1"])
                    .manga_ids(["b1"])
                    .build(),
            )
            .await;
        (store, upstream, RecordingNotifier::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_emit_new_items_by_creator_and_persist_the_counts(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, upstream, notifier) = before_each.await;
        let store = Arc::new(store);
        let notifier = Arc::new(notifier);
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            store.clone(),
            Arc::new(upstream),
            notifier.clone(),
        );

        let report = handler.run().await.expect("poll failed");

        let emitted: Vec<(u64, &str, Category)> = report
            .new_items
            .iter()
            .map(|item| (item.creator_id.0, item.item_id.as_str(), item.category))
            .collect();
        assert_eq!(
            emitted,
            vec![
                (7, "b1", Category::Manga),
                (42, "i7", Category::Illust),
                (42, "i6", Category::Illust),
            ]
        );
        assert_eq!(report.updated, 2);
        assert_eq!(report.delivered, 3);
        assert_eq!(store.get(CreatorId(42)).await, Some(record(42, 7, 2)));
        assert_eq!(store.get(CreatorId(7)).await, Some(record(7, 1, 1)));
        assert_eq!(notifier.delivered().await, report.new_items);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_emit_nothing_on_a_second_run_without_upstream_changes(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, upstream, notifier) = before_each.await;
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            Arc::new(store),
            Arc::new(upstream),
            Arc::new(notifier),
        );
        handler.run().await.expect("first poll failed");
        let second = handler.run().await.expect("second poll failed");
        assert!(second.new_items.is_empty());
        assert_eq!(second.updated, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_abort_without_writing_when_a_fetch_fails(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, upstream, notifier) = before_each.await;
        upstream.fail_for(CreatorId(7)).await;
        let store = Arc::new(store);
        let notifier = Arc::new(notifier);
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            store.clone(),
            Arc::new(upstream),
            notifier.clone(),
        );

        let result = handler.run().await;

        assert!(matches!(
            result,
            Err(CycleError::Upstream(UpstreamError::Status { status: 503, .. }))
        ));
        assert_eq!(store.get(CreatorId(42)).await, Some(record(42, 5, 2)));
        assert_eq!(store.get(CreatorId(7)).await, Some(record(7, 1, 0)));
        assert!(notifier.delivered().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_skip_only_the_failed_creator_when_isolating(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, upstream, notifier) = before_each.await;
        upstream.fail_for(CreatorId(7)).await;
        let store = Arc::new(store);
        let handler =
            PollCycleHandler::new(isolate(), store.clone(), Arc::new(upstream), Arc::new(notifier));

        let report = handler.run().await.expect("isolated poll failed");

        assert_eq!(report.skipped, vec![CreatorId(7)]);
        assert_eq!(report.updated, 1);
        assert_eq!(report.new_items.len(), 2);
        assert_eq!(store.get(CreatorId(42)).await, Some(record(42, 7, 2)));
        assert_eq!(store.get(CreatorId(7)).await, Some(record(7, 1, 0)));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_notify_when_the_commit_fails(#[future] before_each: BeforeEachReturn) {
        let (mut store, upstream, notifier) = before_each.await;
        store.toggle_read_only();
        let notifier = Arc::new(notifier);
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            Arc::new(store),
            Arc::new(upstream),
            notifier.clone(),
        );

        let result = handler.run().await;

        assert!(matches!(result, Err(CycleError::Store(StoreError::Backend(_)))));
        assert!(notifier.delivered().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_before_fetching_when_the_store_is_offline(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (mut store, upstream, notifier) = before_each.await;
        store.toggle_offline();
        let upstream = Arc::new(upstream);
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            Arc::new(store),
            upstream.clone(),
            Arc::new(notifier),
        );

        let result = handler.run().await;

        assert!(matches!(result, Err(CycleError::Store(StoreError::Unavailable(_)))));
        assert_eq!(upstream.snapshot_calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_going_when_a_notification_fails(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, upstream, _) = before_each.await;
        let store = Arc::new(store);
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            store.clone(),
            Arc::new(upstream),
            Arc::new(RecordingNotifier::failing_on(["i7"])),
        );

        let report = handler.run().await.expect("poll failed");

        assert_eq!(report.new_items.len(), 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(store.get(CreatorId(42)).await, Some(record(42, 7, 2)));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_announce_each_item_once_when_runs_overlap(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, _, notifier) = before_each.await;
        let upstream = InMemoryUpstream::with_delay(Duration::from_millis(20));
        upstream
            .set_snapshot(
                SnapshotBuilder::new(42)
                    .totals(7, 2)
                    .illust_ids(["i7", "i6", "i5"])
                    .manga_ids(["m2", "m1"])
                    .build(),
            )
            .await;
        upstream
            .set_snapshot(SnapshotBuilder::new(7).totals(1, 0).illust_ids(["a1"]).build())
            .await;
        let notifier = Arc::new(notifier);
        let handler = PollCycleHandler::new(
            WatchSettings::default(),
            Arc::new(store),
            Arc::new(upstream),
            notifier.clone(),
        );

        let (first, second) = tokio::join!(handler.run(), handler.run());

        let items = first.unwrap().new_items.len() + second.unwrap().new_items.len();
        assert_eq!(items, 2);
        let delivered: Vec<String> = notifier
            .delivered()
            .await
            .into_iter()
            .map(|item| item.item_id)
            .collect();
        assert_eq!(delivered, vec!["i7", "i6"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_run_on_a_spawned_task_over_dyn_ports(
        #[future] before_each: BeforeEachReturn,
    ) {
        let (store, upstream, notifier) = before_each.await;
        let store: Arc<dyn WatchStore> = Arc::new(store);
        let upstream: Arc<dyn UpstreamGateway> = Arc::new(upstream);
        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        let handler = Arc::new(PollCycleHandler::new(
            WatchSettings::default(),
            store,
            upstream,
            notifier,
        ));

        let report = tokio::spawn(async move { handler.run().await })
            .await
            .expect("task panicked")
            .expect("poll failed");

        assert_eq!(report.new_items.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_bound_concurrent_snapshot_fetches() {
        let store = InMemoryWatchStore::with_records((1..=57).map(|id| record(id, 0, 0)));
        let upstream = InMemoryUpstream::with_delay(Duration::from_millis(5));
        for id in 1..=57 {
            upstream.set_snapshot(SnapshotBuilder::new(id).build()).await;
        }
        let upstream = Arc::new(upstream);
        let settings = WatchSettings {
            max_concurrent_requests: NonZeroUsize::new(20).unwrap(),
            ..WatchSettings::default()
        };
        let handler = PollCycleHandler::new(
            settings,
            Arc::new(store),
            upstream.clone(),
            Arc::new(RecordingNotifier::new()),
        );

        let report = handler.run().await.expect("poll failed");

        assert_eq!(report.watched, 57);
        assert_eq!(upstream.snapshot_calls(), 57);
        assert!(upstream.peak_in_flight() <= 20);
    }
}
