// Shared test fixture wiring an AppState over in-memory adapters.

use crate::modules::artist_watch::adapters::outbound::notifier_in_memory::RecordingNotifier;
use crate::modules::artist_watch::adapters::outbound::upstream_in_memory::InMemoryUpstream;
use crate::modules::artist_watch::core::settings::WatchSettings;
use crate::shared::infrastructure::seed_list::in_memory::InMemorySeedList;
use crate::shared::infrastructure::watch_store::in_memory::InMemoryWatchStore;
use crate::shell::state::{AppState, Intervals};
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub store: Arc<InMemoryWatchStore>,
    pub upstream: Arc<InMemoryUpstream>,
    pub notifier: Arc<RecordingNotifier>,
    pub state: AppState,
}

impl TestApp {
    pub fn new(store: InMemoryWatchStore, seeds: InMemorySeedList) -> Self {
        Self::with_upstream(store, seeds, InMemoryUpstream::new())
    }

    pub fn with_upstream(
        store: InMemoryWatchStore,
        seeds: InMemorySeedList,
        upstream: InMemoryUpstream,
    ) -> Self {
        let store = Arc::new(store);
        let upstream = Arc::new(upstream);
        let notifier = Arc::new(RecordingNotifier::new());
        let state = AppState::new(
            WatchSettings::default(),
            Intervals {
                poll: Duration::from_secs(60),
                reconcile: Duration::from_secs(3600),
            },
            store.clone(),
            Arc::new(seeds),
            upstream.clone(),
            notifier.clone(),
        );
        Self {
            store,
            upstream,
            notifier,
            state,
        }
    }

    pub fn empty() -> Self {
        Self::new(InMemoryWatchStore::new(), InMemorySeedList::new())
    }
}
