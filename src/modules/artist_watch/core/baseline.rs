use crate::modules::artist_watch::core::creator::{CreatorId, WatchedCreator};
use crate::modules::artist_watch::core::snapshot::FetchedSnapshot;
use serde::{Deserialize, Serialize};

/// How the first record of a newly discovered creator is seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryBaseline {
    /// Store `total - 1` per category and hold the newest item back, so the
    /// back-catalog is never announced and the next poll only reports growth.
    #[default]
    PreviousItem,
    /// Store the current totals verbatim.
    Current,
}

impl DiscoveryBaseline {
    pub fn discovered(self, id: CreatorId, snapshot: &FetchedSnapshot) -> WatchedCreator {
        let totals = snapshot.totals;
        match self {
            DiscoveryBaseline::PreviousItem => WatchedCreator {
                id,
                counts: totals.map(|total| total.saturating_sub(1)),
                held_back: totals.map(|total| total.min(1)),
            },
            DiscoveryBaseline::Current => WatchedCreator::new(id, totals),
        }
    }
}
