use crate::modules::artist_watch::adapters::outbound::upstream::UpstreamError;
use crate::shared::infrastructure::watch_store::StoreError;
use thiserror::Error;

/// Why a poll or reconciliation cycle was abandoned. An abandoned cycle has
/// written nothing, so the next tick can simply run it again.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
