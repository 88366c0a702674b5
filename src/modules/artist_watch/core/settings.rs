use crate::modules::artist_watch::core::baseline::DiscoveryBaseline;
use crate::shared::infrastructure::bounded_fetch::{BoundedFetch, FailurePolicy};
use std::num::NonZeroUsize;

pub const DEFAULT_MAX_CONCURRENT_REQUESTS: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// Engine knobs handed to the poll and reconciliation handlers at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub max_concurrent_requests: NonZeroUsize,
    pub failure_policy: FailurePolicy,
    pub discovery_baseline: DiscoveryBaseline,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            failure_policy: FailurePolicy::default(),
            discovery_baseline: DiscoveryBaseline::default(),
        }
    }
}

impl WatchSettings {
    pub fn bounded_fetch(&self) -> BoundedFetch {
        BoundedFetch::new(self.max_concurrent_requests, self.failure_policy)
    }
}
