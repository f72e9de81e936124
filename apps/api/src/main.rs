mod analysis;
mod ats;
mod auth;
mod cache;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profiles;
mod routes;
mod state;
mod tailoring;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::JwtVerifier;
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumyx API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize response cache and its hourly sweep
    let cache = Arc::new(ResponseCache::new(config.cache_ttl()?));
    spawn_cache_sweeper(cache.clone());
    info!("Response cache initialized (TTL: {}h)", config.cache_ttl_hours);

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), cache)?;
    if config.gemini_api_key.is_none() {
        info!("GEMINI_API_KEY not set; only users with stored AI settings can tailor");
    }

    let state = AppState {
        db,
        llm,
        jwt: JwtVerifier::new(&config.supabase_jwt_secret),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the deployed frontend

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_cache_sweeper(cache: Arc<ResponseCache>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_SWEEP_INTERVAL);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            let removed = cache.clear_expired().await;
            if removed > 0 {
                info!("Purged {removed} expired cache entries");
            }
        }
    });
}
