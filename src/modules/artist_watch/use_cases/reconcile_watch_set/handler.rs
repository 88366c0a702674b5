use crate::modules::artist_watch::adapters::outbound::upstream::UpstreamGateway;
use crate::modules::artist_watch::core::baseline::DiscoveryBaseline;
use crate::modules::artist_watch::core::creator::CreatorId;
use crate::modules::artist_watch::core::membership::{MembershipDiff, should_watch};
use crate::modules::artist_watch::core::settings::WatchSettings;
use crate::modules::artist_watch::use_cases::errors::CycleError;
use crate::shared::infrastructure::bounded_fetch::{BoundedFetch, FailurePolicy};
use crate::shared::infrastructure::seed_list::SeedList;
use crate::shared::infrastructure::watch_store::WatchStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub seeds: usize,
    pub should_watch: usize,
    pub added: Vec<CreatorId>,
    pub removed: Vec<CreatorId>,
    /// Additions whose initial snapshot could not be fetched; retried next run.
    pub skipped: Vec<CreatorId>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Brings the watch store in line with the union of the seeds' follow lists.
pub struct ReconcileWatchSetHandler<TStore, TSeeds, TUpstream>
where
    TStore: WatchStore + ?Sized,
    TSeeds: SeedList + ?Sized,
    TUpstream: UpstreamGateway + ?Sized,
{
    store: Arc<TStore>,
    seeds: Arc<TSeeds>,
    upstream: Arc<TUpstream>,
    fetch: BoundedFetch,
    baseline: DiscoveryBaseline,
    in_progress: Mutex<()>,
}

impl<TStore, TSeeds, TUpstream> ReconcileWatchSetHandler<TStore, TSeeds, TUpstream>
where
    TStore: WatchStore + ?Sized,
    TSeeds: SeedList + ?Sized,
    TUpstream: UpstreamGateway + ?Sized,
{
    pub fn new(
        settings: WatchSettings,
        store: Arc<TStore>,
        seeds: Arc<TSeeds>,
        upstream: Arc<TUpstream>,
    ) -> Self {
        Self {
            store,
            seeds,
            upstream,
            fetch: settings.bounded_fetch(),
            baseline: settings.discovery_baseline,
            in_progress: Mutex::new(()),
        }
    }

    /// Follow-list failures always abort: a partial union would delete live
    /// entries. Snapshot failures for additions follow the failure policy.
    /// Concurrent calls run one after the other.
    #[tracing::instrument(name = "reconcile_watch_set", skip(self))]
    pub async fn run(&self) -> Result<ReconcileReport, CycleError> {
        let _running = self.in_progress.lock().await;
        let seeds = self.seeds.list().await?;
        let upstream = self.upstream.as_ref();

        let follow_lists = self
            .fetch
            .with_policy(FailurePolicy::AbortOnFirstError)
            .run(seeds.clone(), move |id| upstream.fetch_follow_list(id))
            .await
            .map_err(|aborted| aborted.error)?;
        let wanted = should_watch(follow_lists.into_iter().flatten());

        let current = self.store.ids().await?;
        let diff = MembershipDiff::between(&wanted, &current);

        let additions: Vec<CreatorId> = diff.to_add.iter().copied().collect();
        let outcomes = self
            .fetch
            .run(additions.clone(), move |id| {
                upstream.fetch_creator_snapshot(id)
            })
            .await
            .map_err(|aborted| aborted.error)?;

        let mut report = ReconcileReport {
            seeds: seeds.len(),
            should_watch: wanted.len(),
            ..ReconcileReport::default()
        };
        let mut records = Vec::with_capacity(diff.to_add.len());
        for (id, outcome) in additions.into_iter().zip(outcomes) {
            match outcome {
                Ok(snapshot) => {
                    records.push(self.baseline.discovered(id, &snapshot));
                    report.added.push(id);
                }
                Err(error) => {
                    warn!(creator_id = %id, %error, "addition deferred to next reconciliation");
                    report.skipped.push(id);
                }
            }
        }

        if !records.is_empty() || !diff.to_remove.is_empty() {
            self.store
                .apply_membership(&records, &diff.to_remove)
                .await?;
            report.removed = diff.to_remove.into_iter().collect();
        }

        info!(
            seeds = report.seeds,
            should_watch = report.should_watch,
            added = report.added.len(),
            removed = report.removed.len(),
            skipped = report.skipped.len(),
            "reconciliation finished"
        );
        Ok(report)
    }
}
