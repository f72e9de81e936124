//! Section-by-section resume tailoring.
//!
//! Every operation builds a prompt from the candidate data and the job
//! description, sends it through the resolved provider and parses the reply
//! back into the resume model. Structured sections fall back to the
//! candidate's original data when the model replies with malformed JSON.

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RESUME_WRITER_SYSTEM, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError, ProviderConfig};
use crate::models::resume::{
    Education, Experience, Project, ResumeData, Skills, TailoredResumeData,
};
use crate::tailoring::prompts::{
    GENERATE_SUMMARY_TEMPLATE, TAILOR_EXPERIENCE_TEMPLATE, TAILOR_PROJECTS_TEMPLATE,
    TAILOR_SKILLS_TEMPLATE, TAILOR_SUMMARY_TEMPLATE,
};

/// A provider-bound handle for running tailoring calls.
#[derive(Clone)]
pub struct Tailor {
    llm: LlmClient,
    provider: ProviderConfig,
}

impl Tailor {
    pub fn new(llm: LlmClient, provider: ProviderConfig) -> Self {
        Self { llm, provider }
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub(crate) fn llm(&self) -> &LlmClient {
        &self.llm
    }

    pub async fn generate_summary(&self, experience: &str) -> Result<String, LlmError> {
        let prompt = GENERATE_SUMMARY_TEMPLATE.replace("{experience}", experience);
        self.llm.call(&self.provider, &prompt, RESUME_WRITER_SYSTEM).await
    }

    pub async fn tailor_summary(
        &self,
        additional_info: &str,
        skills: &Skills,
        experience: &[Experience],
        job_description: &str,
    ) -> Result<String, LlmError> {
        let prompt = summary_prompt(additional_info, skills, experience, job_description);
        self.llm.call(&self.provider, &prompt, RESUME_WRITER_SYSTEM).await
    }

    pub async fn tailor_experience(
        &self,
        experience: &[Experience],
        job_description: &str,
    ) -> Result<Vec<Experience>, LlmError> {
        let prompt = experience_prompt(experience, job_description);
        let result = self.llm.call_json(&self.provider, &prompt, JSON_ONLY_SYSTEM).await;
        or_original(result, experience.to_vec(), "experience")
    }

    pub async fn tailor_skills(
        &self,
        skills: &Skills,
        job_description: &str,
    ) -> Result<Skills, LlmError> {
        let prompt = skills_prompt(skills, job_description);
        let result = self.llm.call_json(&self.provider, &prompt, JSON_ONLY_SYSTEM).await;
        or_original(result, skills.clone(), "skills")
    }

    pub async fn tailor_projects(
        &self,
        projects: &[Project],
        job_description: &str,
    ) -> Result<Vec<Project>, LlmError> {
        if projects.is_empty() {
            return Ok(Vec::new());
        }
        let prompt = projects_prompt(projects, job_description);
        let result = self.llm.call_json(&self.provider, &prompt, JSON_ONLY_SYSTEM).await;
        or_original(result, projects.to_vec(), "projects")
    }

    /// Education is factual record; it is passed through untouched.
    pub fn tailor_education(&self, education: &[Education], _job_description: &str) -> Vec<Education> {
        education.to_vec()
    }

    /// Tailors every section concurrently. The first provider failure aborts
    /// the whole resume.
    pub async fn tailor_resume(
        &self,
        profile: &ResumeData,
        job_description: &str,
    ) -> Result<TailoredResumeData, LlmError> {
        info!(
            "Tailoring resume with {} ({}): {} experience entries, {} projects",
            self.provider.provider,
            self.provider.model,
            profile.experience.len(),
            profile.projects.len()
        );

        let (summary, experience, skills, projects) = tokio::try_join!(
            self.tailor_summary(
                &profile.additional_info,
                &profile.skills,
                &profile.experience,
                job_description,
            ),
            self.tailor_experience(&profile.experience, job_description),
            self.tailor_skills(&profile.skills, job_description),
            self.tailor_projects(&profile.projects, job_description),
        )?;
        let education = self.tailor_education(&profile.education, job_description);

        Ok(TailoredResumeData {
            personal_info: profile.personal_info.clone(),
            summary,
            cover_letter: profile.cover_letter.clone(),
            skills,
            experience,
            education,
            projects,
            certifications: profile.certifications.clone(),
        })
    }
}

fn or_original<T>(result: Result<T, LlmError>, original: T, section: &str) -> Result<T, LlmError> {
    match result {
        Err(LlmError::Parse(e)) => {
            warn!("Malformed {section} JSON from provider, keeping original: {e}");
            Ok(original)
        }
        other => other,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

pub(crate) fn summary_prompt(
    additional_info: &str,
    skills: &Skills,
    experience: &[Experience],
    job_description: &str,
) -> String {
    let roles: Vec<_> = experience
        .iter()
        .map(|exp| {
            json!({
                "role": exp.role,
                "company": exp.company,
                "years": format!("{} - {}", exp.start_date, exp.end_date),
            })
        })
        .collect();

    TAILOR_SUMMARY_TEMPLATE
        .replace("{additional_info}", additional_info)
        .replace("{skills}", &to_json(skills))
        .replace("{experience}", &to_json(&roles))
        .replace("{truthfulness}", TRUTHFULNESS_INSTRUCTION)
        .replace("{job_description}", job_description)
}

pub(crate) fn experience_prompt(experience: &[Experience], job_description: &str) -> String {
    TAILOR_EXPERIENCE_TEMPLATE
        .replace("{experience}", &to_json(experience))
        .replace("{truthfulness}", TRUTHFULNESS_INSTRUCTION)
        .replace("{job_description}", job_description)
}

pub(crate) fn skills_prompt(skills: &Skills, job_description: &str) -> String {
    TAILOR_SKILLS_TEMPLATE
        .replace("{skills}", &to_json(skills))
        .replace("{job_description}", job_description)
}

pub(crate) fn projects_prompt(projects: &[Project], job_description: &str) -> String {
    TAILOR_PROJECTS_TEMPLATE
        .replace("{projects}", &to_json(projects))
        .replace("{truthfulness}", TRUTHFULNESS_INSTRUCTION)
        .replace("{job_description}", job_description)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::ResponseCache;

    pub(crate) const JOB: &str = "Senior Rust engineer with AWS and PostgreSQL experience";

    pub(crate) fn tailor() -> (Tailor, Arc<ResponseCache>) {
        let cache = Arc::new(ResponseCache::default());
        let llm = LlmClient::new(Some("test-key".to_string()), cache.clone()).unwrap();
        let provider = llm.resolve(None).unwrap();
        (Tailor::new(llm, provider), cache)
    }

    /// Pre-seeds the response cache so the call never reaches the network.
    pub(crate) async fn seed(tailor: &Tailor, cache: &ResponseCache, system: &str, prompt: &str, reply: &str) {
        let provider = tailor.provider();
        let key = ResponseCache::key(&(provider.provider.as_str(), &provider.model, system, prompt));
        cache.set(key, reply.to_string()).await;
    }

    pub(crate) fn profile() -> ResumeData {
        ResumeData {
            additional_info: "Backend engineer".to_string(),
            skills: Skills {
                languages: vec!["Rust".to_string(), "Python".to_string()],
                databases: vec!["PostgreSQL".to_string()],
                cloud: vec!["AWS".to_string()],
                tools: vec![],
            },
            experience: vec![Experience {
                company: "Acme".to_string(),
                role: "Engineer".to_string(),
                start_date: "2020".to_string(),
                end_date: "2023".to_string(),
                description: vec!["Built billing service".to_string()],
                ..Default::default()
            }],
            education: vec![Education {
                institution: "State University".to_string(),
                degree: "BSc".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_malformed_experience_json_falls_back_to_original() {
        let (tailor, cache) = tailor();
        let profile = profile();
        let prompt = experience_prompt(&profile.experience, JOB);
        seed(&tailor, &cache, JSON_ONLY_SYSTEM, &prompt, "Sorry, here is your resume:").await;

        let experience = tailor.tailor_experience(&profile.experience, JOB).await.unwrap();
        assert_eq!(experience, profile.experience);
    }

    #[tokio::test]
    async fn test_fenced_skills_json_is_parsed() {
        let (tailor, cache) = tailor();
        let profile = profile();
        let prompt = skills_prompt(&profile.skills, JOB);
        let reply = "```json\n{\"languages\": [\"Rust\"], \"databases\": [\"PostgreSQL\"], \"cloud\": [\"AWS\"], \"tools\": []}\n```";
        seed(&tailor, &cache, JSON_ONLY_SYSTEM, &prompt, reply).await;

        let skills = tailor.tailor_skills(&profile.skills, JOB).await.unwrap();
        assert_eq!(skills.languages, vec!["Rust"]);
        assert_eq!(skills.cloud, vec!["AWS"]);
    }

    #[tokio::test]
    async fn test_empty_projects_short_circuit() {
        let (tailor, _cache) = tailor();
        let projects = tailor.tailor_projects(&[], JOB).await.unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn test_education_passes_through() {
        let (tailor, _cache) = tailor();
        let profile = profile();
        assert_eq!(tailor.tailor_education(&profile.education, JOB), profile.education);
    }

    #[tokio::test]
    async fn test_tailor_resume_assembles_sections() {
        let (tailor, cache) = tailor();
        let profile = profile();

        let summary = summary_prompt(
            &profile.additional_info,
            &profile.skills,
            &profile.experience,
            JOB,
        );
        seed(&tailor, &cache, RESUME_WRITER_SYSTEM, &summary, "Rust engineer focused on AWS.").await;
        let experience = experience_prompt(&profile.experience, JOB);
        let reply = r#"[{"company": "Acme", "role": "Engineer", "startDate": "2020", "endDate": "2023", "description": ["Built billing service in Rust on AWS"]}]"#;
        seed(&tailor, &cache, JSON_ONLY_SYSTEM, &experience, reply).await;
        let skills = skills_prompt(&profile.skills, JOB);
        seed(&tailor, &cache, JSON_ONLY_SYSTEM, &skills, "not json").await;

        let tailored = tailor.tailor_resume(&profile, JOB).await.unwrap();
        assert_eq!(tailored.summary, "Rust engineer focused on AWS.");
        assert_eq!(
            tailored.experience[0].description,
            vec!["Built billing service in Rust on AWS"]
        );
        assert_eq!(tailored.skills, profile.skills);
        assert_eq!(tailored.education, profile.education);
        assert!(tailored.projects.is_empty());
    }

    #[test]
    fn test_summary_prompt_lists_roles_with_years() {
        let profile = profile();
        let prompt = summary_prompt("", &profile.skills, &profile.experience, JOB);
        assert!(prompt.contains("\"years\": \"2020 - 2023\""));
        assert!(prompt.contains(JOB));
        assert!(!prompt.contains("{job_description}"));
    }
}
