use crate::modules::artist_watch::core::creator::CreatorId;
use crate::modules::artist_watch::core::snapshot::FetchedSnapshot;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status} for {resource}")]
    Status { resource: String, status: u16 },

    #[error("upstream flagged an error for {resource}: {message}")]
    Api { resource: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}

/// What the watch engine needs from the art-sharing service.
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Current totals and newest-first item ids of both categories.
    async fn fetch_creator_snapshot(&self, id: CreatorId) -> Result<FetchedSnapshot, UpstreamError>;

    /// Every creator `id` follows, across all pages.
    async fn fetch_follow_list(&self, id: CreatorId) -> Result<Vec<CreatorId>, UpstreamError>;
}
