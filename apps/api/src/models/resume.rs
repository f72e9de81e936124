use serde::{Deserialize, Serialize};

/// Contact block at the top of a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl PersonalInfo {
    pub fn has_email(&self) -> bool {
        is_present(&self.email)
    }

    pub fn has_phone(&self) -> bool {
        is_present(&self.phone)
    }

    pub fn has_linkedin(&self) -> bool {
        is_present(&self.linkedin)
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

/// Four priority-ordered skill lists. Order within a list is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub cloud: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Skills {
    /// All skills in list order: languages, databases, cloud, tools.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.languages
            .iter()
            .chain(&self.databases)
            .chain(&self.cloud)
            .chain(&self.tools)
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub id: Option<String>,
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Bullet points, in display order.
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub id: Option<String>,
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// The resume document as submitted by the frontend.
///
/// `skills` is required: a payload without it is rejected at deserialization
/// so the scoring core never sees a structurally incomplete resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Resume after every section has been run through the tailoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub cover_letter: Option<String>,
    pub skills: Skills,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
}
