//! Axum route handlers for the tailoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{ResumeData, TailoredResumeData};
use crate::profiles::repository;
use crate::state::AppState;
use crate::tailoring::batch::{batch_tailor, BatchJobResult};
use crate::tailoring::tailor::Tailor;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub experience: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub profile_data: ResumeData,
    pub job_description: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub tailored_resume: TailoredResumeData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub profile_data: ResumeData,
    pub job_description: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTailorRequest {
    pub profile_data: ResumeData,
    pub job_descriptions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchTailorResponse {
    pub total_jobs: usize,
    pub results: Vec<BatchJobResult>,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// Binds a tailor to the user's stored provider, or the service default.
async fn tailor_for(state: &AppState, user_id: Option<Uuid>) -> Result<Tailor, AppError> {
    let settings = match user_id {
        Some(user_id) => repository::get_ai_settings(&state.db, user_id).await?,
        None => None,
    };
    let provider = state.llm.resolve(settings.as_ref())?;
    Ok(Tailor::new(state.llm.clone(), provider))
}

fn require_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("Job description is required".to_string()));
    }
    Ok(())
}

/// POST /api/ai/generate-summary
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(req): Json<GenerateSummaryRequest>,
) -> Result<Json<GenerateSummaryResponse>, AppError> {
    if req.experience.trim().is_empty() {
        return Err(AppError::Validation("Experience data is required".to_string()));
    }

    let tailor = tailor_for(&state, req.user_id).await?;
    let summary = tailor.generate_summary(&req.experience).await?;
    Ok(Json(GenerateSummaryResponse { summary }))
}

/// POST /api/ai/tailor-resume
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    require_job_description(&req.job_description)?;

    let tailor = tailor_for(&state, req.user_id).await?;
    let tailored_resume = tailor
        .tailor_resume(&req.profile_data, &req.job_description)
        .await?;
    Ok(Json(TailorResponse { tailored_resume }))
}

/// POST /api/ai/generate-cover-letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    require_job_description(&req.job_description)?;

    let tailor = tailor_for(&state, req.user_id).await?;
    let cover_letter = tailor
        .generate_cover_letter(
            &req.profile_data,
            &req.job_description,
            req.instructions.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /api/ai/batch-tailor
///
/// Requires stored AI settings; the service-wide default provider is not
/// used for batches.
pub async fn handle_batch_tailor(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<BatchTailorRequest>,
) -> Result<Json<BatchTailorResponse>, AppError> {
    let settings = repository::get_ai_settings(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::PreconditionRequired("AI provider not configured".to_string()))?;
    let provider = state.llm.resolve(Some(&settings))?;
    let tailor = Tailor::new(state.llm.clone(), provider);

    info!(
        "Batch tailoring {} job descriptions for user {}",
        req.job_descriptions.len(),
        user.user_id
    );
    let results = batch_tailor(&tailor, &req.profile_data, &req.job_descriptions).await;

    Ok(Json(BatchTailorResponse {
        total_jobs: results.len(),
        message: format!("Processed {} job descriptions", results.len()),
        results,
    }))
}
