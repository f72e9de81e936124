use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// LLM vendors a user can route tailoring calls through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::OpenAi => "openai",
            AiProvider::OpenRouter => "openrouter",
        }
    }

    /// Model used when the stored settings leave the model blank.
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.0-flash-exp",
            AiProvider::OpenAi => "gpt-4o-mini",
            AiProvider::OpenRouter => "anthropic/claude-3.5-sonnet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "gemini" => Some(AiProvider::Gemini),
            "openai" => Some(AiProvider::OpenAi),
            "openrouter" => Some(AiProvider::OpenRouter),
            _ => None,
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AiProvider::Gemini => "Gemini",
            AiProvider::OpenAi => "OpenAI",
            AiProvider::OpenRouter => "OpenRouter",
        };
        f.write_str(label)
    }
}

/// Request body for saving a user's provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettingsConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Settings as returned to clients. Never carries the API key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettingsResponse {
    pub provider: AiProvider,
    pub model: String,
    pub site_url: Option<String>,
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AiSettingsRow {
    pub user_id: Uuid,
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub site_url: Option<String>,
    pub app_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AiSettingsRow {
    /// Unknown provider strings in the table fall back to the default provider.
    pub fn provider(&self) -> AiProvider {
        AiProvider::parse(&self.provider).unwrap_or_default()
    }

    pub fn to_response(&self) -> AiSettingsResponse {
        AiSettingsResponse {
            provider: self.provider(),
            model: self.model.clone(),
            site_url: self.site_url.clone(),
            app_name: self.app_name.clone(),
        }
    }
}
