use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use artist_watch::modules::artist_watch::adapters::outbound::notifier::{LogNotifier, Notifier};
use artist_watch::modules::artist_watch::adapters::outbound::notifier_webhook::WebhookNotifier;
use artist_watch::modules::artist_watch::adapters::outbound::upstream_http::HttpUpstreamGateway;
use artist_watch::shared::infrastructure::seed_list::json_file::JsonFileSeedList;
use artist_watch::shared::infrastructure::watch_store::json_file::JsonFileWatchStore;
use artist_watch::shell::config::Config;
use artist_watch::shell::http::router;
use artist_watch::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;

    let upstream = HttpUpstreamGateway::new(&config.base_url, &config.session_id, &config.user_agent)
        .context("building the upstream client")?;
    let seeds = JsonFileSeedList::open(&config.seeds_path, config.seeds.clone())
        .await
        .with_context(|| format!("opening seed list {}", config.seeds_path.display()))?;
    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };

    let state = AppState::new(
        config.settings(),
        config.intervals(),
        Arc::new(JsonFileWatchStore::new(&config.store_path)),
        Arc::new(seeds),
        Arc::new(upstream),
        notifier,
    );

    if config.autostart {
        state.scheduler.start().await;
    }

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("binding {}", config.http_addr))?;
    tracing::info!(addr = %config.http_addr, "operator api listening");
    axum::serve(listener, router(state))
        .await
        .context("serving the operator api")?;
    Ok(())
}
