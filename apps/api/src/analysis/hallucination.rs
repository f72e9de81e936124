//! Detects numbers and years that appear in tailored text but not in the
//! candidate's original wording.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::resume::Experience;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:,\d+)*(?:\.\d+)?%?").expect("number pattern is valid"));

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("year pattern is valid"));

const FABRICATION_WARNING: &str = "Detected potential fabricated data";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facts {
    pub numbers: Vec<String>,
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheck {
    pub safe: bool,
    pub new_numbers: Vec<String>,
    pub new_dates: Vec<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub safe: bool,
    pub issues: Vec<String>,
}

pub fn extract_facts(text: &str) -> Facts {
    let all = |re: &Regex| -> Vec<String> {
        re.find_iter(text).map(|m| m.as_str().to_string()).collect()
    };
    Facts {
        numbers: all(&NUMBER_RE),
        dates: all(&YEAR_RE),
    }
}

pub fn check_fact_preservation(original: &str, tailored: &str) -> FactCheck {
    let before = extract_facts(original);
    let after = extract_facts(tailored);

    let new_numbers: Vec<String> = after
        .numbers
        .into_iter()
        .filter(|n| !before.numbers.contains(n))
        .collect();
    let new_dates: Vec<String> = after
        .dates
        .into_iter()
        .filter(|d| !before.dates.contains(d))
        .collect();

    let fabricated = !new_numbers.is_empty() || !new_dates.is_empty();
    FactCheck {
        safe: !fabricated,
        new_numbers,
        new_dates,
        warning: fabricated.then(|| FABRICATION_WARNING.to_string()),
    }
}

/// Compares roles pairwise. Extra entries on either side are not inspected.
pub fn verify_experience_accuracy(
    original: &[Experience],
    tailored: &[Experience],
) -> AccuracyReport {
    let mut issues = Vec::new();

    for (orig, tail) in original.iter().zip(tailored) {
        if orig.company != tail.company {
            issues.push(format!(
                "Company name changed: {} -> {}",
                orig.company, tail.company
            ));
        }
        if orig.role != tail.role {
            issues.push(format!("Role changed: {} -> {}", orig.role, tail.role));
        }
        if orig.start_date != tail.start_date || orig.end_date != tail.end_date {
            issues.push(format!("Dates changed for {}", orig.company));
        }

        for (orig_bullet, tail_bullet) in orig.description.iter().zip(&tail.description) {
            let check = check_fact_preservation(orig_bullet, tail_bullet);
            if let Some(warning) = check.warning {
                issues.push(format!(
                    "Potential fabrication in {}: {warning}",
                    orig.company
                ));
            }
        }
    }

    AccuracyReport {
        safe: issues.is_empty(),
        issues,
    }
}
