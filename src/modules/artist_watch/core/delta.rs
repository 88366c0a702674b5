// Pure delta computation for one watched creator.
//
// Purpose
// - Recover exactly the newly published item ids from two counts and a newest-first id list.
//
// Responsibilities
// - Per category: growth of k yields the first k ids, anything else yields nothing.
// - A count regression is a resynchronization: no items, lower count becomes the baseline.
// - Never perform input or output.

use crate::modules::artist_watch::core::creator::{Category, ItemId, NewItem, WatchedCreator};
use crate::modules::artist_watch::core::snapshot::FetchedSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub new_items: Vec<NewItem>,
    /// Record to persist, present when any category count changed.
    pub updated: Option<WatchedCreator>,
}

pub fn compute_delta(previous: &WatchedCreator, snapshot: &FetchedSnapshot) -> Delta {
    let seen = previous.seen();
    let current = snapshot.totals;

    let new_items = Category::ALL
        .into_iter()
        .flat_map(|category| {
            newly_published(seen.get(category), current.get(category), snapshot.ids(category))
                .iter()
                .map(move |item_id| NewItem {
                    creator_id: previous.id,
                    item_id: item_id.clone(),
                    category,
                })
        })
        .collect();

    let updated = (current != seen).then(|| WatchedCreator::new(previous.id, current));

    Delta { new_items, updated }
}

fn newly_published(seen: u64, current: u64, ids: &[ItemId]) -> &[ItemId] {
    let diff = current.saturating_sub(seen);
    let take = usize::try_from(diff).unwrap_or(usize::MAX).min(ids.len());
    &ids[..take]
}
