use crate::modules::artist_watch::adapters::outbound::notifier::Notifier;
use crate::modules::artist_watch::adapters::outbound::upstream::UpstreamGateway;
use crate::modules::artist_watch::core::settings::WatchSettings;
use crate::modules::artist_watch::use_cases::manage_seeds::handler::ManageSeedsHandler;
use crate::modules::artist_watch::use_cases::reconcile_watch_set::handler::ReconcileWatchSetHandler;
use crate::modules::artist_watch::use_cases::run_poll_cycle::handler::PollCycleHandler;
use crate::shared::infrastructure::seed_list::SeedList;
use crate::shared::infrastructure::watch_store::WatchStore;
use crate::shell::scheduler::Scheduler;
use std::sync::Arc;
use std::time::Duration;

pub type PollHandler = PollCycleHandler<dyn WatchStore, dyn UpstreamGateway, dyn Notifier>;
pub type ReconcileHandler =
    ReconcileWatchSetHandler<dyn WatchStore, dyn SeedList, dyn UpstreamGateway>;
pub type SeedsHandler = ManageSeedsHandler<dyn WatchStore, dyn SeedList, dyn UpstreamGateway>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub poll: Duration,
    pub reconcile: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WatchStore>,
    pub poll_handler: Arc<PollHandler>,
    pub reconcile_handler: Arc<ReconcileHandler>,
    pub seeds_handler: Arc<SeedsHandler>,
    pub scheduler: Arc<Scheduler>,
}

impl AppState {
    /// Wires the handlers and the (stopped) scheduler around the given adapters.
    pub fn new(
        settings: WatchSettings,
        intervals: Intervals,
        store: Arc<dyn WatchStore>,
        seeds: Arc<dyn SeedList>,
        upstream: Arc<dyn UpstreamGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let poll_handler = Arc::new(PollCycleHandler::new(
            settings,
            store.clone(),
            upstream.clone(),
            notifier,
        ));
        let reconcile_handler = Arc::new(ReconcileWatchSetHandler::new(
            settings,
            store.clone(),
            seeds.clone(),
            upstream,
        ));
        let seeds_handler = Arc::new(ManageSeedsHandler::new(seeds, reconcile_handler.clone()));
        let scheduler = Arc::new(
            Scheduler::new()
                .every(intervals.reconcile, reconcile_handler.clone())
                .every(intervals.poll, poll_handler.clone()),
        );
        Self {
            store,
            poll_handler,
            reconcile_handler,
            seeds_handler,
            scheduler,
        }
    }
}
