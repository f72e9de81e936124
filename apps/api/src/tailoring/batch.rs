//! Tailoring one profile against several job descriptions at once.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::LlmError;
use crate::models::resume::{Experience, ResumeData, Skills};
use crate::tailoring::tailor::Tailor;

/// Jobs beyond this many are ignored.
pub const MAX_BATCH_JOBS: usize = 5;

const JOB_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchJobResult {
    Success {
        job_description: String,
        summary: String,
        experience_count: usize,
    },
    Error {
        job_description: String,
        error: String,
    },
}

/// Runs summary, experience and skills tailoring for every job concurrently.
pub async fn batch_tailor(
    tailor: &Tailor,
    profile: &ResumeData,
    job_descriptions: &[String],
) -> Vec<BatchJobResult> {
    if job_descriptions.len() > MAX_BATCH_JOBS {
        warn!(
            "Batch of {} job descriptions truncated to {MAX_BATCH_JOBS}",
            job_descriptions.len()
        );
    }

    let jobs = job_descriptions
        .iter()
        .take(MAX_BATCH_JOBS)
        .map(|job| tailor_for_job(tailor, profile, job));
    let results = join_all(jobs).await;

    let failed = results
        .iter()
        .filter(|r| matches!(r, BatchJobResult::Error { .. }))
        .count();
    info!("Batch tailoring finished: {} jobs, {failed} failed", results.len());
    results
}

async fn tailor_for_job(tailor: &Tailor, profile: &ResumeData, job: &str) -> BatchJobResult {
    let (summary, experience, skills) = tokio::join!(
        tailor.tailor_summary(
            &profile.additional_info,
            &profile.skills,
            &profile.experience,
            job,
        ),
        tailor.tailor_experience(&profile.experience, job),
        tailor.tailor_skills(&profile.skills, job),
    );
    job_result(job_preview(job), summary, experience, skills)
}

/// A job only counts as failed when no section could be tailored.
fn job_result(
    job_description: String,
    summary: Result<String, LlmError>,
    experience: Result<Vec<Experience>, LlmError>,
    skills: Result<Skills, LlmError>,
) -> BatchJobResult {
    match (summary, experience, skills) {
        (Err(e), Err(_), Err(_)) => BatchJobResult::Error {
            job_description,
            error: e.to_string(),
        },
        (summary, experience, _) => BatchJobResult::Success {
            job_description,
            summary: summary.unwrap_or_default(),
            experience_count: experience.map(|exp| exp.len()).unwrap_or(0),
        },
    }
}

fn job_preview(job: &str) -> String {
    let preview: String = job.chars().take(JOB_PREVIEW_CHARS).collect();
    format!("{preview}...")
}
