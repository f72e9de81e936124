//! Cover-letter generation and clean-up.
//!
//! The frontend renders its own salutation and signature, so whatever the
//! model wraps around the body paragraphs is stripped before returning.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::llm_client::prompts::RESUME_WRITER_SYSTEM;
use crate::llm_client::LlmError;
use crate::models::resume::ResumeData;
use crate::tailoring::prompts::COVER_LETTER_TEMPLATE;
use crate::tailoring::tailor::Tailor;

/// Signature lines are short; anything longer is treated as prose.
const MAX_SIGNATURE_WORDS: usize = 4;

static SALUTATIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?im)^Dear\s+(?:Hiring\s+Manager|Sir/Madam|.*?Team|.*?Committee)[,:]?\s*\n*",
        r"(?im)^To\s+Whom\s+It\s+May\s+Concern[,:]?\s*\n*",
        r"(?im)^Hello[,:]?\s*\n*",
        r"(?im)^Greetings[,:]?\s*\n*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("salutation pattern is valid"))
    .collect()
});

/// A closing phrase on its own paragraph, and everything after it.
static CLOSINGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"Sincerely",
        r"Best\s+regards",
        r"Kind\s+regards",
        r"Warm\s+regards",
        r"Warmest\s+regards",
        r"Respectfully\s+yours",
        r"Respectfully",
        r"Thank\s+you",
        r"Thanks",
        r"Yours\s+(?:truly|sincerely|faithfully)",
        r"Best",
        r"Regards",
        r"Cordially",
    ]
    .iter()
    .map(|phrase| {
        Regex::new(&format!(r"(?is)\n+\s*{phrase},?.*")).expect("closing pattern is valid")
    })
    .collect()
});

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

impl Tailor {
    pub async fn generate_cover_letter(
        &self,
        profile: &ResumeData,
        job_description: &str,
        instructions: &str,
    ) -> Result<String, LlmError> {
        let prompt = cover_letter_prompt(profile, job_description, instructions);
        let raw = self
            .llm()
            .call(self.provider(), &prompt, RESUME_WRITER_SYSTEM)
            .await?;

        let name = profile.personal_info.full_name.as_deref().unwrap_or_default();
        let cleaned = clean_cover_letter(&raw, name);
        info!(
            "Generated cover letter: {} chars raw, {} chars after clean-up",
            raw.len(),
            cleaned.len()
        );
        Ok(cleaned)
    }
}

pub(crate) fn cover_letter_prompt(
    profile: &ResumeData,
    job_description: &str,
    instructions: &str,
) -> String {
    let instructions = if instructions.trim().is_empty() {
        "None"
    } else {
        instructions
    };

    COVER_LETTER_TEMPLATE
        .replace(
            "{name}",
            profile.personal_info.full_name.as_deref().unwrap_or_default(),
        )
        .replace("{summary}", profile.summary.as_deref().unwrap_or_default())
        .replace(
            "{experience}",
            &serde_json::to_string_pretty(&profile.experience).unwrap_or_default(),
        )
        .replace(
            "{skills}",
            &serde_json::to_string(&profile.skills).unwrap_or_default(),
        )
        .replace("{instructions}", instructions)
        .replace("{job_description}", job_description)
}

/// Reduces a generated letter to its body paragraphs.
pub fn clean_cover_letter(content: &str, candidate_name: &str) -> String {
    let mut content = content.to_string();

    for salutation in SALUTATIONS.iter() {
        content = salutation.replace_all(&content, "").into_owned();
    }
    for closing in CLOSINGS.iter() {
        content = closing.replace_all(&content, "").into_owned();
    }

    let name = candidate_name.trim();
    if !name.is_empty() {
        content = strip_trailing_name(&content, &regex::escape(name));

        let parts: Vec<&str> = name.split_whitespace().collect();
        if let [first, .., last] = parts.as_slice() {
            let first_last = format!(r"{}\s+{}", regex::escape(first), regex::escape(last));
            content = strip_trailing_name(&content, &first_last);
        }
    }

    let mut lines: Vec<&str> = content.split('\n').collect();
    while let Some(last) = lines.last().copied().map(str::trim) {
        if last.is_empty() || last.split_whitespace().count() > MAX_SIGNATURE_WORDS {
            break;
        }
        if last.ends_with(['.', '!', '?', ',', ';', ':']) {
            break;
        }
        lines.pop();
    }

    let joined = lines.join("\n");
    EXCESS_NEWLINES
        .replace_all(joined.trim(), "\n\n")
        .into_owned()
}

fn strip_trailing_name(content: &str, name_pattern: &str) -> String {
    match Regex::new(&format!(r"(?i)\n*\s*{name_pattern}\s*$")) {
        Ok(re) => re.replace(content, "").into_owned(),
        Err(_) => content.to_string(),
    }
}
