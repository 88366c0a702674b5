use crate::modules::artist_watch::core::creator::CreatorId;
use std::collections::BTreeSet;

/// Unions the seeds' follow lists into the set of creators that should be watched.
pub fn should_watch<L>(follow_lists: L) -> BTreeSet<CreatorId>
where
    L: IntoIterator,
    L::Item: IntoIterator<Item = CreatorId>,
{
    follow_lists.into_iter().flatten().collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: BTreeSet<CreatorId>,
    pub to_remove: BTreeSet<CreatorId>,
}

impl MembershipDiff {
    pub fn between(should_watch: &BTreeSet<CreatorId>, current: &BTreeSet<CreatorId>) -> Self {
        Self {
            to_add: should_watch.difference(current).copied().collect(),
            to_remove: current.difference(should_watch).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// The membership reached by applying this diff to `current`.
    pub fn apply(&self, current: &BTreeSet<CreatorId>) -> BTreeSet<CreatorId> {
        current
            .union(&self.to_add)
            .filter(|id| !self.to_remove.contains(id))
            .copied()
            .collect()
    }
}
