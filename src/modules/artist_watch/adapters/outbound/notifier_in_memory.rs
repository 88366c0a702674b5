use crate::modules::artist_watch::adapters::outbound::notifier::{Notifier, NotifyError};
use crate::modules::artist_watch::core::creator::{ItemId, NewItem};
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Keeps delivered items in memory; rejects the item ids it was told to fail on.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<NewItem>>,
    failing: HashSet<ItemId>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on<S: Into<ItemId>>(item_ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            failing: item_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub async fn delivered(&self) -> Vec<NewItem> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, item: &NewItem) -> Result<(), NotifyError> {
        if self.failing.contains(&item.item_id) {
            return Err(NotifyError::Delivery(format!("rejected {}", item.item_id)));
        }
        self.delivered.lock().await.push(item.clone());
        Ok(())
    }
}
