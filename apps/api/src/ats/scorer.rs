//! ATS Scorer: aggregates keyword, formatting, experience and skills scores
//! into a single compatibility score with strengths, improvements and feedback.
//!
//! Pure and synchronous: no I/O, no shared state. Every ratio is floored, and
//! the weighted sum is computed in integer percent so results are reproducible.

use serde::{Deserialize, Serialize};

use crate::ats::matcher::calculate_keyword_match;
use crate::ats::sections::{score_experience_relevance, score_formatting, score_skills_alignment};
use crate::models::resume::ResumeData;

// ────────────────────────────────────────────────────────────────────────────
// Weights and thresholds
// ────────────────────────────────────────────────────────────────────────────

/// Component weights in percent. Must sum to 100.
pub const KEYWORD_WEIGHT: u32 = 40;
pub const FORMATTING_WEIGHT: u32 = 15;
pub const EXPERIENCE_WEIGHT: u32 = 25;
pub const SKILLS_WEIGHT: u32 = 20;

const KEYWORD_STRENGTH: u32 = 70;
const FORMATTING_STRENGTH: u32 = 85;
const EXPERIENCE_STRENGTH: u32 = 70;
const SKILLS_STRENGTH: u32 = 70;

const KEYWORD_IMPROVEMENT: u32 = 60;
const FORMATTING_IMPROVEMENT: u32 = 70;
const EXPERIENCE_IMPROVEMENT: u32 = 60;
const SKILLS_IMPROVEMENT: u32 = 60;

const EXCELLENT_TIER: u32 = 80;
const GOOD_TIER: u32 = 60;

/// Missing keywords quoted in the keyword improvement suggestion.
const SUGGESTED_KEYWORDS: usize = 5;
/// Improvements folded into the feedback string.
const FEEDBACK_IMPROVEMENTS: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Four independent component scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: u32,
    pub formatting: u32,
    pub experience_relevance: u32,
    pub skills_alignment: u32,
}

impl ScoreBreakdown {
    /// Builds a breakdown, clamping every component to [0, 100].
    pub fn new(
        keyword_match: u32,
        formatting: u32,
        experience_relevance: u32,
        skills_alignment: u32,
    ) -> Self {
        Self {
            keyword_match: keyword_match.min(100),
            formatting: formatting.min(100),
            experience_relevance: experience_relevance.min(100),
            skills_alignment: skills_alignment.min(100),
        }
    }

    /// floor(0.40·keyword + 0.15·formatting + 0.25·experience + 0.20·skills)
    pub fn overall(&self) -> u32 {
        (self.keyword_match * KEYWORD_WEIGHT
            + self.formatting * FORMATTING_WEIGHT
            + self.experience_relevance * EXPERIENCE_WEIGHT
            + self.skills_alignment * SKILLS_WEIGHT)
            / 100
    }
}

/// Full ATS report returned to callers. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u32,
    pub feedback: String,
    pub breakdown: ScoreBreakdown,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume against a job description.
pub fn calculate_comprehensive_score(resume: &ResumeData, job_text: &str) -> ScoreReport {
    let keyword_match = calculate_keyword_match(resume, job_text);

    let breakdown = ScoreBreakdown::new(
        keyword_match.match_percentage,
        score_formatting(resume),
        score_experience_relevance(resume, job_text),
        score_skills_alignment(resume, job_text),
    );
    let score = breakdown.overall();

    let strengths = identify_strengths(resume, &breakdown);
    let improvements = generate_improvements(&breakdown, &keyword_match.missing_keywords);
    let feedback = build_feedback(score, &improvements);

    ScoreReport {
        score,
        feedback,
        breakdown,
        missing_keywords: keyword_match.missing_keywords,
        strengths,
        improvements,
    }
}

fn identify_strengths(resume: &ResumeData, breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut strengths = Vec::new();

    if breakdown.keyword_match >= KEYWORD_STRENGTH {
        strengths.push("Strong keyword optimization".to_string());
    }
    if breakdown.formatting >= FORMATTING_STRENGTH {
        strengths.push("Well-structured and complete resume".to_string());
    }
    if breakdown.experience_relevance >= EXPERIENCE_STRENGTH {
        strengths.push("Highly relevant work experience".to_string());
    }
    if breakdown.skills_alignment >= SKILLS_STRENGTH {
        strengths.push("Skills strongly aligned with job requirements".to_string());
    }

    let has_quantified_bullet = resume
        .experience
        .iter()
        .flat_map(|exp| &exp.description)
        .any(|bullet| bullet.chars().any(|c| c.is_ascii_digit()));
    if has_quantified_bullet {
        strengths.push("Good use of quantified achievements".to_string());
    }

    strengths
}

/// Suggestions ordered keyword, formatting, experience, skills.
fn generate_improvements(breakdown: &ScoreBreakdown, missing_keywords: &[String]) -> Vec<String> {
    let mut improvements = Vec::new();

    if breakdown.keyword_match < KEYWORD_IMPROVEMENT {
        let top_missing: Vec<&str> = missing_keywords
            .iter()
            .take(SUGGESTED_KEYWORDS)
            .map(String::as_str)
            .collect();
        improvements.push(format!("Add key terms: {}", top_missing.join(", ")));
    }
    if breakdown.formatting < FORMATTING_IMPROVEMENT {
        improvements.push("Ensure all contact information is complete".to_string());
    }
    if breakdown.experience_relevance < EXPERIENCE_IMPROVEMENT {
        improvements.push("Rewrite experience bullets to emphasize relevant skills".to_string());
    }
    if breakdown.skills_alignment < SKILLS_IMPROVEMENT {
        improvements.push("Add more job-relevant skills to your skills section".to_string());
    }

    if improvements.is_empty() {
        improvements.push("Resume is well-optimized. Consider minor keyword enhancements.".to_string());
    }

    improvements
}

fn build_feedback(score: u32, improvements: &[String]) -> String {
    let tier = if score >= EXCELLENT_TIER {
        "Excellent ATS compatibility!"
    } else if score >= GOOD_TIER {
        "Good ATS compatibility with room for improvement."
    } else {
        "Needs optimization for better ATS compatibility."
    };

    let top: Vec<&str> = improvements
        .iter()
        .take(FEEDBACK_IMPROVEMENTS)
        .map(String::as_str)
        .collect();

    format!("{tier} {}", top.join(" "))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
