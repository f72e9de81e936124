use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::bullet_ranker::{rank_experience_bullets, DEFAULT_KEEP_TOP_N};
use crate::analysis::hallucination::verify_experience_accuracy;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{Experience, ResumeData};
use crate::state::AppState;

fn default_keep_top_n() -> usize {
    DEFAULT_KEEP_TOP_N
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankBulletsRequest {
    pub profile_data: ResumeData,
    pub job_description: String,
    #[serde(rename = "keep_top_n", default = "default_keep_top_n")]
    pub keep_top_n: usize,
}

#[derive(Debug, Serialize)]
pub struct RankBulletsResponse {
    pub ranked_experience: Vec<Experience>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyAccuracyRequest {
    pub original: ResumeData,
    pub tailored: ResumeData,
}

#[derive(Debug, Serialize)]
pub struct VerifyAccuracyResponse {
    pub verified: bool,
    pub issues: Vec<String>,
    pub message: String,
}

/// POST /api/ai/rank-bullets
pub async fn handle_rank_bullets(
    State(_state): State<AppState>,
    user: AuthUser,
    Json(req): Json<RankBulletsRequest>,
) -> Result<Json<RankBulletsResponse>, AppError> {
    let ranked_experience = rank_experience_bullets(
        &req.profile_data.experience,
        &req.job_description,
        req.keep_top_n,
    );
    info!(
        "Ranked bullets for user {} across {} roles",
        user.user_id,
        ranked_experience.len()
    );

    Ok(Json(RankBulletsResponse {
        ranked_experience,
        message: format!("Ranked and kept top {} bullets per role", req.keep_top_n),
    }))
}

/// POST /api/ai/verify-accuracy
pub async fn handle_verify_accuracy(
    State(_state): State<AppState>,
    _user: AuthUser,
    Json(req): Json<VerifyAccuracyRequest>,
) -> Result<Json<VerifyAccuracyResponse>, AppError> {
    let report = verify_experience_accuracy(&req.original.experience, &req.tailored.experience);
    let message = if report.safe {
        "Resume verified"
    } else {
        "Issues detected"
    };

    Ok(Json(VerifyAccuracyResponse {
        verified: report.safe,
        issues: report.issues,
        message: message.to_string(),
    }))
}
