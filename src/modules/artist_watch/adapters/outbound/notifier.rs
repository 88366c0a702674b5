use crate::modules::artist_watch::core::creator::NewItem;
use async_trait::async_trait;
use thiserror::Error;

pub const ARTWORK_BASE_URL: &str = "https://www.pixiv.net/artworks";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Delivery(err.to_string())
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, item: &NewItem) -> Result<(), NotifyError>;
}

pub fn artwork_url(item: &NewItem) -> String {
    format!("{ARTWORK_BASE_URL}/{}", item.item_id)
}

/// Delivers items in order. A failed delivery is logged and skipped; it never
/// reaches the caller. Returns how many items were delivered.
pub async fn deliver_all<N>(notifier: &N, items: &[NewItem]) -> usize
where
    N: Notifier + ?Sized,
{
    let mut delivered = 0;
    for item in items {
        match notifier.notify(item).await {
            Ok(()) => delivered += 1,
            Err(error) => tracing::warn!(
                creator_id = %item.creator_id,
                item_id = %item.item_id,
                %error,
                "notification dropped"
            ),
        }
    }
    delivered
}

/// Writes each new item to the log. Used when no webhook is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, item: &NewItem) -> Result<(), NotifyError> {
        tracing::info!(
            creator_id = %item.creator_id,
            category = ?item.category,
            url = %artwork_url(item),
            "new artwork"
        );
        Ok(())
    }
}
