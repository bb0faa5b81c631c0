use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use quake_backend::config::Config;
use quake_backend::logging;
use quake_backend::module::quake::{PhivolcsFetcher, QuakeManager};
use quake_backend::service::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_or_default("config.toml")?;

    // Initialize logging
    let _logging_guard = logging::init_logging("logs", "quake-backend", &config.log_level);

    tracing::info!("quake-backend starting...");
    tracing::info!("Upstream page: {}", config.upstream_url);
    tracing::info!(
        "Cache TTL: {}s, fetch timeout: {}s",
        config.cache_ttl_secs,
        config.fetch_timeout_secs
    );

    // One fetcher and one cache manager for the whole process; handlers
    // get a shared handle, never a global.
    let fetcher = Arc::new(PhivolcsFetcher::new(
        &config.upstream_url,
        Duration::from_secs(config.fetch_timeout_secs),
    ));
    let manager = Arc::new(QuakeManager::new(fetcher, config.cache_ttl_secs));

    let app = service::router(AppState::new(manager), config.enable_cors);

    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
