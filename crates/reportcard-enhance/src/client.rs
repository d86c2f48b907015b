//! Chat completion client.

use reportcard_core::models::language::Language;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EnhanceError;
use crate::normalize::{normalize, strip_formatting};
use crate::prompt::Prompt;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Prefix of the text returned instead of an enhancement when no credential
/// is configured and placeholders are enabled.
pub const PLACEHOLDER_PREFIX: &str = "[Placeholder enhancement – no API key configured]";

// ── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceConfig {
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Return a labelled placeholder rather than failing when `api_key` is
    /// missing. Meant for offline demos.
    pub placeholder_when_unconfigured: bool,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            placeholder_when_unconfigured: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EnhanceClient {
    http: Client,
    config: EnhanceConfig,
}

impl EnhanceClient {
    pub fn new(config: EnhanceConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Rewrite `text` as a more professional assessment in `language`.
    ///
    /// One request, no retries. The reply is stripped of formatting and cut
    /// to the language's length limit.
    pub async fn enhance(&self, text: &str, language: Language) -> Result<String, EnhanceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EnhanceError::EmptyInput);
        }

        let Some(api_key) = self.api_key() else {
            if self.config.placeholder_when_unconfigured {
                warn!("no API key configured, returning placeholder enhancement");
                return Ok(format!("{PLACEHOLDER_PREFIX} {text}"));
            }
            return Err(EnhanceError::Configuration(
                "no API key configured; set REPORTCARD_API_KEY or api_key in the config file"
                    .to_string(),
            ));
        };

        let prompt = Prompt::new(language, text);
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                Message {
                    role: "system",
                    content: prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: prompt.max_tokens,
            frequency_penalty: 0.3,
            presence_penalty: 0.3,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        info!(model = %self.config.model, %language, chars = text.chars().count(), "requesting enhancement");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|error| error.message);
            let message = detail.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            warn!(status = status.as_u16(), %message, "completion API returned an error");
            return Err(EnhanceError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnhanceError::MalformedResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                EnhanceError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        if strip_formatting(&content).is_empty() {
            return Err(EnhanceError::MalformedResponse(
                "completion was empty".to_string(),
            ));
        }

        let enhanced = normalize(&content, language);
        info!(chars = enhanced.chars().count(), "enhancement received");
        Ok(enhanced)
    }
}
