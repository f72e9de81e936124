use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::cache::CacheStats;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub cache_stats: CacheStats,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CacheClearResponse {
    pub message: String,
}

/// GET /api/ai/cache/stats
pub async fn handle_cache_stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<CacheStatsResponse>, AppError> {
    let cache_stats = state.llm.cache().stats().await;
    Ok(Json(CacheStatsResponse {
        cache_stats,
        message: "Cache statistics retrieved".to_string(),
    }))
}

/// POST /api/ai/cache/clear
pub async fn handle_cache_clear(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CacheClearResponse>, AppError> {
    state.llm.cache().clear().await;
    info!("Response cache cleared by user {}", user.user_id);
    Ok(Json(CacheClearResponse {
        message: "Cache cleared successfully".to_string(),
    }))
}
