use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::ats::scorer::{calculate_comprehensive_score, ScoreReport};
use crate::errors::AppError;
use crate::models::resume::ResumeData;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub profile_data: ResumeData,
    pub job_description: String,
}

/// POST /api/ai/ats-score
///
/// Scoring is local and deterministic; no provider is called.
pub async fn handle_ats_score(
    Json(req): Json<AtsScoreRequest>,
) -> Result<Json<ScoreReport>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("Job description is required".to_string()));
    }

    let report = calculate_comprehensive_score(&req.profile_data, &req.job_description);
    info!(
        "ATS score {} (keywords {}%, {} missing)",
        report.score,
        report.breakdown.keyword_match,
        report.missing_keywords.len()
    );
    Ok(Json(report))
}
