//! Ranks experience bullets by how well they speak to a job description.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::resume::Experience;

static TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z][a-zA-Z0-9+#.-]*\b").expect("term pattern is valid"));

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Terms that always count as important regardless of length.
const PRIORITY_TERMS: &[&str] = &[
    "develop", "design", "implement", "architect", "lead", "manage", "python", "java",
    "javascript", "react", "node", "aws", "azure", "docker", "kubernetes", "sql", "nosql", "api",
    "microservices",
];

const ACTION_VERBS: &[&str] = &[
    "developed", "designed", "implemented", "led", "managed", "created", "built", "architected",
    "optimized", "improved",
];

/// Words longer than this are important even outside the priority list.
const MIN_IMPORTANT_LEN: usize = 6;
const MAX_IMPORTANT_TERMS: usize = 30;

const POINTS_PER_MATCH: u32 = 15;
const MAX_MATCH_POINTS: u32 = 60;
const QUANTIFIED_POINTS: u32 = 20;
const ACTION_VERB_POINTS: u32 = 20;

pub const DEFAULT_KEEP_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletScore {
    pub bullet: String,
    pub score: u32,
    pub has_quantification: bool,
    pub keyword_matches: usize,
    pub reason: String,
}

/// Important terms of a job description, in first-occurrence order.
pub fn extract_important_terms(job_description: &str) -> Vec<String> {
    let lowered = job_description.to_lowercase();
    let mut seen = HashSet::new();

    TERM_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| PRIORITY_TERMS.contains(word) || word.len() > MIN_IMPORTANT_LEN)
        .filter(|word| seen.insert(*word))
        .take(MAX_IMPORTANT_TERMS)
        .map(str::to_string)
        .collect()
}

pub fn score_bullet(bullet: &str, important_terms: &[String]) -> BulletScore {
    let lowered = bullet.to_lowercase();

    let keyword_matches = important_terms
        .iter()
        .filter(|term| lowered.contains(term.as_str()))
        .count();
    let has_quantification = DIGITS_RE.is_match(bullet);
    let has_action_verb = ACTION_VERBS.iter().any(|verb| lowered.contains(verb));

    let match_points = (keyword_matches as u32)
        .saturating_mul(POINTS_PER_MATCH)
        .min(MAX_MATCH_POINTS);
    let mut score = match_points;
    if has_quantification {
        score += QUANTIFIED_POINTS;
    }
    if has_action_verb {
        score += ACTION_VERB_POINTS;
    }
    let score = score.min(100);

    let strength = match score {
        70.. => "Strong",
        40.. => "Moderate",
        _ => "Weak",
    };

    BulletScore {
        bullet: bullet.to_string(),
        score,
        has_quantification,
        keyword_matches,
        reason: format!("{strength} relevance"),
    }
}

/// Keeps each role's `keep_top_n` best bullets, best first. Ties keep their
/// original order.
pub fn rank_experience_bullets(
    experience: &[Experience],
    job_description: &str,
    keep_top_n: usize,
) -> Vec<Experience> {
    let terms = extract_important_terms(job_description);

    experience
        .iter()
        .map(|exp| {
            let mut scored: Vec<BulletScore> = exp
                .description
                .iter()
                .map(|bullet| score_bullet(bullet, &terms))
                .collect();
            scored.sort_by(|a, b| b.score.cmp(&a.score));

            Experience {
                description: scored
                    .into_iter()
                    .take(keep_top_n)
                    .map(|s| s.bullet)
                    .collect(),
                ..exp.clone()
            }
        })
        .collect()
}
