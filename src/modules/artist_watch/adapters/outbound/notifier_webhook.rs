use crate::modules::artist_watch::adapters::outbound::notifier::{
    Notifier, NotifyError, artwork_url,
};
use crate::modules::artist_watch::core::creator::NewItem;
use serde::Serialize;

/// Posts a bare artwork link to a chat webhook (Discord-compatible `content` payload).
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct WebhookMessage {
    content: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, item: &NewItem) -> Result<(), NotifyError> {
        let message = WebhookMessage {
            content: artwork_url(item),
        };
        let resp = self.client.post(&self.url).json(&message).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery(format!(
                "webhook returned {}: {body}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}
