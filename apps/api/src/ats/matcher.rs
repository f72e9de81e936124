//! Keyword matching between the job description and the resume haystack.

use crate::ats::keywords::{extract_keywords, top_keywords};
use crate::models::resume::ResumeData;

/// How many of the most frequent job keywords count as "important".
pub const IMPORTANT_KEYWORD_LIMIT: usize = 30;
/// Missing keywords are only reported from this many top keywords.
pub const MISSING_CANDIDATE_LIMIT: usize = 15;
/// Upper bound on the missing-keyword list.
pub const MISSING_KEYWORD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub match_percentage: u32,
    /// Ordered by job-description frequency, most frequent first.
    pub missing_keywords: Vec<String>,
}

/// Joins every searchable part of the resume into one lowercase string:
/// additional info, the four skill lists, then all experience bullets.
pub fn build_haystack(resume: &ResumeData) -> String {
    let experience_text = resume
        .experience
        .iter()
        .map(|exp| exp.description.join(" "))
        .collect::<Vec<_>>()
        .join(" ");

    [
        resume.additional_info.clone(),
        resume.skills.languages.join(" "),
        resume.skills.databases.join(" "),
        resume.skills.cloud.join(" "),
        resume.skills.tools.join(" "),
        experience_text,
    ]
    .join(" ")
    .to_lowercase()
}

/// Scores how many of the job's important keywords appear in the resume.
///
/// Matching is plain substring containment against the haystack, so a short
/// keyword can match inside a longer word ("java" inside "javascript").
pub fn calculate_keyword_match(resume: &ResumeData, job_text: &str) -> KeywordMatch {
    let job_keywords = extract_keywords(job_text);
    let important: Vec<String> = top_keywords(&job_keywords, IMPORTANT_KEYWORD_LIMIT)
        .into_iter()
        .map(|(keyword, _)| keyword)
        .collect();

    let haystack = build_haystack(resume);

    let matched = important
        .iter()
        .filter(|keyword| haystack.contains(keyword.as_str()))
        .count();

    let match_percentage = if important.is_empty() {
        0
    } else {
        (matched * 100 / important.len()) as u32
    };

    let missing_keywords = important
        .iter()
        .take(MISSING_CANDIDATE_LIMIT)
        .filter(|keyword| !haystack.contains(keyword.as_str()))
        .take(MISSING_KEYWORD_LIMIT)
        .cloned()
        .collect();

    KeywordMatch {
        match_percentage,
        missing_keywords,
    }
}
