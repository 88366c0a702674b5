use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable upstream identifier of a creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatorId(pub u64);

impl fmt::Display for CreatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CreatorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CreatorId)
    }
}

/// Upstream artwork identifiers are opaque strings (numeric in practice).
pub type ItemId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Illust,
    Manga,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Illust, Category::Manga];
}

/// Per-category publication counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub illust: u64,
    pub manga: u64,
}

impl Counts {
    pub fn new(illust: u64, manga: u64) -> Self {
        Self { illust, manga }
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Illust => self.illust,
            Category::Manga => self.manga,
        }
    }

    pub fn map(self, f: impl Fn(u64) -> u64) -> Self {
        Self {
            illust: f(self.illust),
            manga: f(self.manga),
        }
    }

    pub fn saturating_add(self, other: Counts) -> Self {
        Self {
            illust: self.illust.saturating_add(other.illust),
            manga: self.manga.saturating_add(other.manga),
        }
    }
}

/// Persisted watch record.
///
/// `held_back` counts the items that were already published when the creator
/// was discovered but sit above the stored `counts`. They are never announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedCreator {
    pub id: CreatorId,
    pub counts: Counts,
    #[serde(default)]
    pub held_back: Counts,
}

impl WatchedCreator {
    pub fn new(id: CreatorId, counts: Counts) -> Self {
        Self {
            id,
            counts,
            held_back: Counts::default(),
        }
    }

    /// The counts a fresh snapshot is compared against.
    pub fn seen(&self) -> Counts {
        self.counts.saturating_add(self.held_back)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub creator_id: CreatorId,
    pub item_id: ItemId,
    pub category: Category,
}
