use sqlx::PgPool;

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Provider gateway. Owns the shared response cache.
    pub llm: LlmClient,
    pub config: Config,
    pub jwt: JwtVerifier,
}
