// HTTP implementation of the UpstreamGateway port against the service's ajax endpoints.
//
// Responsibilities
// - Attach the session cookie and user agent to every request.
// - Reject non-success statuses and bodies carrying `"error": true`.
// - Page through follow lists until the declared total is covered.

use crate::modules::artist_watch::adapters::outbound::upstream::{UpstreamError, UpstreamGateway};
use crate::modules::artist_watch::core::creator::{CreatorId, ItemId};
use crate::modules::artist_watch::core::snapshot::FetchedSnapshot;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const FOLLOW_PAGE_SIZE: u64 = 100;

pub struct HttpUpstreamGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstreamGateway {
    pub fn new(base_url: &str, session_id: &str, user_agent: &str) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|e| UpstreamError::Transport(e.to_string()))?,
        );
        if !session_id.is_empty() {
            let mut cookie = HeaderValue::from_str(&format!("PHPSESSID={session_id}"))
                .map_err(|e| UpstreamError::Transport(e.to_string()))?;
            cookie.set_sensitive(true);
            headers.insert(COOKIE, cookie);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_body<T: DeserializeOwned>(&self, resource: String) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, resource);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        unwrap_envelope(&resource, &bytes)
    }
}

#[async_trait::async_trait]
impl UpstreamGateway for HttpUpstreamGateway {
    async fn fetch_creator_snapshot(&self, id: CreatorId) -> Result<FetchedSnapshot, UpstreamError> {
        let body: ProfileBody = self
            .get_body(format!("/ajax/user/{id}/profile/all"))
            .await?;
        Ok(body.into_snapshot(id))
    }

    async fn fetch_follow_list(&self, id: CreatorId) -> Result<Vec<CreatorId>, UpstreamError> {
        let mut follows = Vec::new();
        let mut offset = 0;
        loop {
            let page: FollowingPage = self
                .get_body(format!(
                    "/ajax/user/{id}/following?offset={offset}&limit={FOLLOW_PAGE_SIZE}&rest=show"
                ))
                .await?;
            let fetched = page.users.len();
            for user in page.users {
                follows.push(user.user_id.parse::<CreatorId>().map_err(|_| {
                    UpstreamError::Decode(format!("invalid userId {:?}", user.user_id))
                })?);
            }
            offset += FOLLOW_PAGE_SIZE;
            tracing::debug!(creator_id = %id, offset, total = page.total, "fetched follow page");
            if fetched == 0 || offset >= page.total {
                break;
            }
        }
        Ok(follows)
    }
}

#[derive(Deserialize)]
struct Envelope {
    error: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    body: serde_json::Value,
}

fn unwrap_envelope<T: DeserializeOwned>(resource: &str, bytes: &[u8]) -> Result<T, UpstreamError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if envelope.error {
        return Err(UpstreamError::Api {
            resource: resource.to_string(),
            message: envelope.message,
        });
    }
    Ok(serde_json::from_value(envelope.body)?)
}

/// Works are keyed by id in an object, or sent as an empty array when there are none.
#[derive(Deserialize)]
#[serde(untagged)]
enum WorkIndex {
    Keyed(serde_json::Map<String, serde_json::Value>),
    Empty(Vec<serde_json::Value>),
}

impl WorkIndex {
    fn newest_first(self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = match self {
            WorkIndex::Keyed(map) => map.into_iter().map(|(id, _)| id).collect(),
            WorkIndex::Empty(_) => Vec::new(),
        };
        ids.sort_by(|a, b| {
            let numeric = |s: &str| s.parse::<u64>().unwrap_or(0);
            numeric(b).cmp(&numeric(a)).then_with(|| b.cmp(a))
        });
        ids
    }
}

impl Default for WorkIndex {
    fn default() -> Self {
        WorkIndex::Empty(Vec::new())
    }
}

#[derive(Deserialize)]
struct ProfileBody {
    #[serde(default)]
    illusts: WorkIndex,
    #[serde(default)]
    manga: WorkIndex,
}

impl ProfileBody {
    fn into_snapshot(self, id: CreatorId) -> FetchedSnapshot {
        FetchedSnapshot::from_ids(id, self.illusts.newest_first(), self.manga.newest_first())
    }
}

#[derive(Deserialize)]
struct FollowingPage {
    #[serde(default)]
    users: Vec<FollowedUser>,
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize)]
struct FollowedUser {
    #[serde(rename = "userId")]
    user_id: String,
}
