// Shared test fixture for FetchedSnapshot.
// Compiled into the crate only during tests through the `tests` module in src/lib.rs.

use crate::modules::artist_watch::core::creator::{Counts, CreatorId};
use crate::modules::artist_watch::core::snapshot::FetchedSnapshot;

pub struct SnapshotBuilder {
    inner: FetchedSnapshot,
}

impl SnapshotBuilder {
    /// Empty snapshot: zero totals and no item ids.
    pub fn new(creator_id: u64) -> Self {
        Self {
            inner: FetchedSnapshot {
                creator_id: CreatorId(creator_id),
                totals: Counts::default(),
                illust_ids: Vec::new(),
                manga_ids: Vec::new(),
            },
        }
    }

    pub fn totals(mut self, illust: u64, manga: u64) -> Self {
        self.inner.totals = Counts::new(illust, manga);
        self
    }

    pub fn illust_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.inner.illust_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn manga_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.inner.manga_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> FetchedSnapshot {
        self.inner
    }
}
