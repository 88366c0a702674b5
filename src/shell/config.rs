use std::env;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::modules::artist_watch::core::baseline::DiscoveryBaseline;
use crate::modules::artist_watch::core::creator::CreatorId;
use crate::modules::artist_watch::core::settings::{
    DEFAULT_MAX_CONCURRENT_REQUESTS, WatchSettings,
};
use crate::shared::infrastructure::bounded_fetch::FailurePolicy;
use crate::shell::state::Intervals;

pub const CONFIG_PATH_VAR: &str = "ARTIST_WATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.101 Mobile Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Application configuration: a JSON file, then environment overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session_id: String,
    pub base_url: String,
    pub user_agent: String,
    pub webhook_url: Option<String>,
    pub store_path: PathBuf,
    pub seeds_path: PathBuf,
    /// Initial seeds, used only until the seed file exists.
    #[serde(alias = "watchlist")]
    pub seeds: Vec<CreatorId>,
    pub max_concurrent_requests: NonZeroUsize,
    pub failure_policy: FailurePolicy,
    pub discovery_baseline: DiscoveryBaseline,
    pub poll_interval_secs: u64,
    pub reconcile_interval_secs: u64,
    pub http_addr: SocketAddr,
    pub autostart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            base_url: "https://www.pixiv.net".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            webhook_url: None,
            store_path: PathBuf::from("artists.json"),
            seeds_path: PathBuf::from("seeds.json"),
            seeds: Vec::new(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            failure_policy: FailurePolicy::default(),
            discovery_baseline: DiscoveryBaseline::default(),
            poll_interval_secs: 60,
            reconcile_interval_secs: 3600,
            http_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            autostart: false,
        }
    }
}

impl Config {
    /// Loads the file named by `ARTIST_WATCH_CONFIG` (default `config.json`),
    /// applies environment overrides and validates the result.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(Path::new(&path))?;
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(session_id) = lookup("ARTIST_WATCH_SESSION_ID") {
            self.session_id = session_id;
        }
        if let Some(base_url) = lookup("ARTIST_WATCH_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(webhook_url) = lookup("ARTIST_WATCH_WEBHOOK_URL") {
            self.webhook_url = Some(webhook_url).filter(|url| !url.is_empty());
        }
        if let Some(addr) = lookup("ARTIST_WATCH_HTTP_ADDR") {
            self.http_addr = addr.parse().map_err(|err: std::net::AddrParseError| {
                ConfigError::Invalid {
                    field: "http_addr",
                    reason: err.to_string(),
                }
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_id.trim().is_empty() {
            return Err(ConfigError::Missing("session_id"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("base_url"));
        }
        for (field, secs) in [
            ("poll_interval_secs", self.poll_interval_secs),
            ("reconcile_interval_secs", self.reconcile_interval_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn settings(&self) -> WatchSettings {
        WatchSettings {
            max_concurrent_requests: self.max_concurrent_requests,
            failure_policy: self.failure_policy,
            discovery_baseline: self.discovery_baseline,
        }
    }

    pub fn intervals(&self) -> Intervals {
        Intervals {
            poll: Duration::from_secs(self.poll_interval_secs),
            reconcile: Duration::from_secs(self.reconcile_interval_secs),
        }
    }
}
