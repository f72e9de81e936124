//! Section scorers. Each returns an integer percentage in [0, 100].

use crate::ats::keywords::keyword_set;
use crate::models::resume::ResumeData;

const FORMATTING_BASE: i32 = 100;
const MISSING_EMAIL_PENALTY: i32 = 15;
const MISSING_PHONE_PENALTY: i32 = 10;
const MISSING_EXPERIENCE_PENALTY: i32 = 30;
const MISSING_CORE_SKILLS_PENALTY: i32 = 20;
const MISSING_EDUCATION_PENALTY: i32 = 15;
const LINKEDIN_BONUS: i32 = 5;
const PROJECTS_BONUS: i32 = 5;

/// Structural completeness: penalties for missing essentials, small bonuses
/// for a professional-network link and projects.
pub fn score_formatting(resume: &ResumeData) -> u32 {
    let mut score = FORMATTING_BASE;

    if !resume.personal_info.has_email() {
        score -= MISSING_EMAIL_PENALTY;
    }
    if !resume.personal_info.has_phone() {
        score -= MISSING_PHONE_PENALTY;
    }
    if resume.experience.is_empty() {
        score -= MISSING_EXPERIENCE_PENALTY;
    }
    if resume.skills.languages.is_empty() && resume.skills.tools.is_empty() {
        score -= MISSING_CORE_SKILLS_PENALTY;
    }
    if resume.education.is_empty() {
        score -= MISSING_EDUCATION_PENALTY;
    }

    if resume.personal_info.has_linkedin() {
        score += LINKEDIN_BONUS;
    }
    if !resume.projects.is_empty() {
        score += PROJECTS_BONUS;
    }

    score.clamp(0, 100) as u32
}

/// Mean keyword-set overlap between each experience entry and the job.
///
/// Per entry: `100 * |job ∩ entry| / max(|job|, 1)`, capped at 100. Every entry
/// shares the same denominator, so the mean is computed exactly in integers
/// and floored once.
pub fn score_experience_relevance(resume: &ResumeData, job_text: &str) -> u32 {
    if resume.experience.is_empty() {
        return 0;
    }

    let job_keywords = keyword_set(job_text);
    let denominator = job_keywords.len().max(1);

    let total: usize = resume
        .experience
        .iter()
        .map(|exp| {
            let exp_keywords = keyword_set(&exp.description.join(" "));
            let overlap = job_keywords.intersection(&exp_keywords).count();
            (overlap * 100).min(denominator * 100)
        })
        .sum();

    (total / (denominator * resume.experience.len())) as u32
}

/// Share of the resume's skills mentioned anywhere in the job description
/// (case-insensitive substring test against the raw text).
pub fn score_skills_alignment(resume: &ResumeData, job_text: &str) -> u32 {
    let skills: Vec<&String> = resume.skills.all().collect();
    if skills.is_empty() {
        return 0;
    }

    let job_lower = job_text.to_lowercase();
    let matched = skills
        .iter()
        .filter(|skill| job_lower.contains(&skill.to_lowercase()))
        .count();

    ((matched * 100 / skills.len()) as u32).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Education, Experience, PersonalInfo, Project, Skills};

    fn experience(bullets: &[&str]) -> Experience {
        Experience {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            description: bullets.iter().map(|b| b.to_string()).collect(),
            ..Default::default()
        }
    }

    fn complete_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                email: Some("dev@example.com".to_string()),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
            skills: Skills {
                languages: vec!["Rust".to_string()],
                ..Default::default()
            },
            experience: vec![experience(&["Built services"])],
            education: vec![Education {
                institution: "State University".to_string(),
                degree: "BSc".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_formatting_complete_resume_is_100() {
        assert_eq!(score_formatting(&complete_resume()), 100);
    }

    #[test]
    fn test_formatting_empty_resume_is_10() {
        // 100 - 15 - 10 - 30 - 20 - 15
        assert_eq!(score_formatting(&ResumeData::default()), 10);
    }

    #[test]
    fn test_formatting_missing_experience_costs_exactly_30() {
        let with = complete_resume();
        let mut without = complete_resume();
        without.experience.clear();
        assert_eq!(score_formatting(&with) - score_formatting(&without), 30);
    }

    #[test]
    fn test_formatting_skills_penalty_needs_both_languages_and_tools_empty() {
        let mut resume = complete_resume();
        resume.skills.languages.clear();
        resume.skills.tools = vec!["Git".to_string()];
        assert_eq!(score_formatting(&resume), 100);

        resume.skills.tools.clear();
        resume.skills.cloud = vec!["AWS".to_string()];
        assert_eq!(score_formatting(&resume), 80);
    }

    #[test]
    fn test_formatting_bonuses_are_clamped_to_100() {
        let mut resume = complete_resume();
        resume.personal_info.linkedin = Some("linkedin.com/in/dev".to_string());
        resume.projects.push(Project {
            name: "Side project".to_string(),
            ..Default::default()
        });
        assert_eq!(score_formatting(&resume), 100);
    }

    #[test]
    fn test_formatting_bonuses_offset_penalties() {
        let mut resume = complete_resume();
        resume.personal_info.phone = None;
        resume.personal_info.linkedin = Some("linkedin.com/in/dev".to_string());
        assert_eq!(score_formatting(&resume), 95);
    }

    #[test]
    fn test_experience_relevance_zero_without_experience() {
        let mut resume = complete_resume();
        resume.experience.clear();
        assert_eq!(score_experience_relevance(&resume, "rust tokio axum"), 0);
    }

    #[test]
    fn test_experience_relevance_averages_entries() {
        let mut resume = complete_resume();
        // job set = {rust, tokio, axum, postgres}
        resume.experience = vec![
            experience(&["Wrote rust services with tokio"]), // 2/4 → 50
            experience(&["Managed postgres"]),               // 1/4 → 25
        ];
        assert_eq!(
            score_experience_relevance(&resume, "Rust, Tokio, Axum, Postgres"),
            37
        );
    }

    #[test]
    fn test_experience_relevance_counts_distinct_keywords_only() {
        let mut resume = complete_resume();
        resume.experience = vec![experience(&["rust rust rust"])];
        // job set = {rust, kafka}
        assert_eq!(score_experience_relevance(&resume, "rust rust kafka"), 50);
    }

    #[test]
    fn test_experience_relevance_empty_job_is_zero() {
        let resume = complete_resume();
        assert_eq!(score_experience_relevance(&resume, ""), 0);
    }

    #[test]
    fn test_skills_alignment_counts_substring_hits() {
        let mut resume = complete_resume();
        resume.skills = Skills {
            languages: vec!["Python".to_string(), "Go".to_string()],
            cloud: vec!["AWS".to_string()],
            tools: vec!["Terraform".to_string()],
            ..Default::default()
        };
        // python and aws in the job; "go" is not a substring of it
        assert_eq!(
            score_skills_alignment(&resume, "Python developer for AWS"),
            50
        );
    }

    #[test]
    fn test_skills_alignment_zero_without_skills() {
        let mut resume = complete_resume();
        resume.skills = Skills::default();
        assert_eq!(score_skills_alignment(&resume, "python"), 0);
    }

    #[test]
    fn test_skills_alignment_counts_duplicates_individually() {
        let mut resume = complete_resume();
        resume.skills = Skills {
            languages: vec!["Rust".to_string(), "Rust".to_string(), "Zig".to_string()],
            ..Default::default()
        };
        assert_eq!(score_skills_alignment(&resume, "rust"), 66);
    }
}
