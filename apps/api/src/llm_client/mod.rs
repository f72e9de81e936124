//! LLM Client: the single point of entry for all provider calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! All LLM interactions MUST go through this module.
//!
//! Providers: Gemini (default), OpenAI, OpenRouter. The provider is resolved
//! per request from the user's stored AI settings.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::models::ai_settings::{AiProvider, AiSettingsRow};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const TEMPERATURE: f32 = 0.2;
const MAX_OUTPUT_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{provider} rate limited after {retries} retries")]
    RateLimited { provider: AiProvider, retries: u32 },

    #[error("API key is required for provider {0}")]
    MissingApiKey(AiProvider),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider resolution
// ────────────────────────────────────────────────────────────────────────────

/// Fully-resolved provider settings for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    pub site_url: Option<String>,
    pub app_name: Option<String>,
}

impl ProviderConfig {
    /// Uses the stored settings when present, otherwise the default Gemini
    /// provider with the service-wide key.
    pub fn resolve(
        settings: Option<&AiSettingsRow>,
        default_gemini_key: Option<&str>,
    ) -> Result<Self, LlmError> {
        let Some(settings) = settings else {
            let api_key = default_gemini_key
                .filter(|key| !key.is_empty())
                .ok_or(LlmError::MissingApiKey(AiProvider::Gemini))?;
            return Ok(Self {
                provider: AiProvider::Gemini,
                api_key: api_key.to_string(),
                model: AiProvider::Gemini.default_model().to_string(),
                site_url: None,
                app_name: None,
            });
        };

        let provider = settings.provider();
        let api_key = if !settings.api_key.is_empty() {
            settings.api_key.clone()
        } else if provider == AiProvider::Gemini {
            default_gemini_key
                .filter(|key| !key.is_empty())
                .ok_or(LlmError::MissingApiKey(provider))?
                .to_string()
        } else {
            return Err(LlmError::MissingApiKey(provider));
        };
        let model = if settings.model.trim().is_empty() {
            provider.default_model().to_string()
        } else {
            settings.model.clone()
        };

        Ok(Self {
            provider,
            api_key,
            model,
            site_url: settings.site_url.clone(),
            app_name: settings.app_name.clone(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire formats
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Error envelope shared by all three providers.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl ChatResponse {
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

impl GeminiResponse {
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
/// Wraps the provider APIs with retry logic, response caching and structured
/// output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    default_gemini_key: Option<String>,
    cache: Arc<ResponseCache>,
}

impl LlmClient {
    pub fn new(
        default_gemini_key: Option<String>,
        cache: Arc<ResponseCache>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            default_gemini_key,
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Resolves the provider for a user from their stored settings.
    pub fn resolve(&self, settings: Option<&AiSettingsRow>) -> Result<ProviderConfig, LlmError> {
        ProviderConfig::resolve(settings, self.default_gemini_key.as_deref())
    }

    /// Calls the provider and returns the trimmed text response.
    /// Cached responses are returned without a network call.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        system: &str,
    ) -> Result<String, LlmError> {
        let cache_key = ResponseCache::key(&(
            provider.provider.as_str(),
            &provider.model,
            system,
            prompt,
        ));
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        let mut last_error: Option<LlmError> = None;
        let mut rate_limited = false;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "{} call attempt {} failed, retrying after {}ms...",
                    provider.provider,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.build_request(provider, prompt, system).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("{} API returned {}: {}", provider.provider, status, body);
                rate_limited = status.as_u16() == 429;
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let text = extract_text(provider.provider, &body)?;
            let text = text.trim().to_string();

            self.cache.set(cache_key, text.clone()).await;
            return Ok(text);
        }

        if rate_limited {
            return Err(LlmError::RateLimited {
                provider: provider.provider,
                retries: MAX_RETRIES,
            });
        }
        Err(last_error.unwrap_or(LlmError::EmptyContent))
    }

    /// Convenience method that calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.call(provider, prompt, system).await?;
        let text = strip_json_fences(&text);
        serde_json::from_str(text).map_err(LlmError::Parse)
    }

    fn build_request(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        system: &str,
    ) -> RequestBuilder {
        match provider.provider {
            AiProvider::Gemini => self
                .client
                .post(format!(
                    "{GEMINI_API_BASE}/models/{}:generateContent",
                    provider.model
                ))
                .query(&[("key", provider.api_key.as_str())])
                .json(&gemini_request(prompt, system)),
            AiProvider::OpenAi => self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&provider.api_key)
                .json(&chat_request(&provider.model, prompt, system)),
            AiProvider::OpenRouter => {
                let mut request = self
                    .client
                    .post(OPENROUTER_API_URL)
                    .bearer_auth(&provider.api_key);
                if let Some(site_url) = &provider.site_url {
                    request = request.header("HTTP-Referer", site_url);
                }
                if let Some(app_name) = &provider.app_name {
                    request = request.header("X-Title", app_name);
                }
                request.json(&chat_request(&provider.model, prompt, system))
            }
        }
    }
}

fn chat_request<'a>(model: &'a str, prompt: &'a str, system: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_OUTPUT_TOKENS,
    }
}

fn gemini_request<'a>(prompt: &'a str, system: &'a str) -> GeminiRequest<'a> {
    GeminiRequest {
        system_instruction: GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: system }],
        },
        contents: vec![GeminiContent {
            role: Some("user"),
            parts: vec![GeminiPart { text: prompt }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

/// Pulls the generated text out of a provider's success body.
fn extract_text(provider: AiProvider, body: &str) -> Result<String, LlmError> {
    match provider {
        AiProvider::Gemini => {
            let response: GeminiResponse = serde_json::from_str(body)?;
            if let Some(usage) = &response.usage_metadata {
                debug!(
                    "Gemini call succeeded: input_tokens={}, output_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }
            response.text().ok_or(LlmError::EmptyContent)
        }
        AiProvider::OpenAi | AiProvider::OpenRouter => {
            let response: ChatResponse = serde_json::from_str(body)?;
            if let Some(usage) = &response.usage {
                debug!(
                    "{} call succeeded: input_tokens={}, output_tokens={}",
                    provider, usage.prompt_tokens, usage.completion_tokens
                );
            }
            response
                .text()
                .map(str::to_string)
                .ok_or(LlmError::EmptyContent)
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
