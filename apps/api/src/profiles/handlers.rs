use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::ai_settings::{AiSettingsConfig, AiSettingsResponse};
use crate::models::profile::ProfileRow;
use crate::models::resume::ResumeData;
use crate::profiles::repository;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub user_id: Uuid,
    pub profile_data: ResumeData,
    #[serde(default)]
    pub target_jd: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileResponse {
    pub message: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/profile/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    repository::get_profile(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// POST /api/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    repository::save_profile(
        &state.db,
        req.user_id,
        &req.profile_data,
        req.target_jd.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(SaveProfileResponse {
        message: "Profile saved successfully".to_string(),
        user_id: req.user_id,
    }))
}

/// DELETE /api/profile/:user_id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    repository::delete_profile(&state.db, user_id).await?;
    Ok(Json(MessageResponse {
        message: "Profile deleted successfully".to_string(),
    }))
}

/// GET /api/ai-settings
pub async fn handle_get_ai_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AiSettingsResponse>, AppError> {
    repository::get_ai_settings(&state.db, user.user_id)
        .await?
        .map(|row| Json(row.to_response()))
        .ok_or_else(|| AppError::NotFound("AI settings not configured".to_string()))
}

/// PUT /api/ai-settings
pub async fn handle_save_ai_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(config): Json<AiSettingsConfig>,
) -> Result<Json<AiSettingsResponse>, AppError> {
    let row = repository::save_ai_settings(&state.db, user.user_id, &config).await?;
    Ok(Json(row.to_response()))
}

/// DELETE /api/ai-settings
pub async fn handle_delete_ai_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    repository::delete_ai_settings(&state.db, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
