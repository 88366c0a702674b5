use crate::modules::artist_watch::core::creator::{Category, Counts, CreatorId, ItemId};

/// Point-in-time read of a creator from upstream. Item ids are newest-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSnapshot {
    pub creator_id: CreatorId,
    pub totals: Counts,
    pub illust_ids: Vec<ItemId>,
    pub manga_ids: Vec<ItemId>,
}

impl FetchedSnapshot {
    /// Builds a snapshot whose totals are the lengths of the id lists.
    pub fn from_ids(creator_id: CreatorId, illust_ids: Vec<ItemId>, manga_ids: Vec<ItemId>) -> Self {
        Self {
            creator_id,
            totals: Counts::new(illust_ids.len() as u64, manga_ids.len() as u64),
            illust_ids,
            manga_ids,
        }
    }

    pub fn ids(&self, category: Category) -> &[ItemId] {
        match category {
            Category::Illust => &self.illust_ids,
            Category::Manga => &self.manga_ids,
        }
    }
}
