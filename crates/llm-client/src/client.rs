//! OpenRouter client with linear key rotation
//!
//! One synchronous round trip per attempt, whole reply buffered, bounded
//! timeout. Failures are classified per key: credential-scoped failures
//! (401/403/429, transport errors) rotate to the next configured key, while
//! anything else surfaces immediately rather than burning the remaining
//! keys on a request that cannot succeed.

use std::time::Duration;

use a11y_types::Issue;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use suggest_engine::{AiSuggestError, AiSuggester};
use tracing::warn;

use crate::prompt::build_prompt;
use crate::LlmError;

/// OpenRouter chat-completion endpoint.
const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error details quoted back to callers are capped at this length.
const MAX_ERROR_DETAIL_LEN: usize = 200;

/// Upstream configuration, built once at startup and passed into the
/// client — business logic never reads the environment directly.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Ordered credential list; tried front to back.
    pub api_keys: Vec<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Read the credential list from `OPENROUTER_API_KEY`, comma-separated
    /// when several keys are provisioned.
    pub fn from_env() -> Self {
        let raw = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();
        Self {
            api_keys: parse_keys(&raw),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_keys.is_empty()
    }
}

/// Split a raw credential string into the ordered key list, dropping empty
/// segments.
pub fn parse_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    /// Null in some provider responses (refusals, upstream errors).
    #[serde(default)]
    content: Option<String>,
}

/// Outcome of trying one credential.
enum KeyOutcome {
    Success(String),
    /// Key-scoped failure; the next credential may still work.
    Rotate(String),
    /// Request-scoped failure; rotating keys cannot help.
    Terminal(LlmError),
}

/// True for statuses that indicate a problem with this credential rather
/// than with the request itself.
fn is_key_scoped(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    )
}

fn truncate_detail(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_DETAIL_LEN {
        text.to_string()
    } else {
        text.chars().take(MAX_ERROR_DETAIL_LEN).collect()
    }
}

/// Client for AI remediation suggestions.
pub struct SuggestClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl SuggestClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Produce an AI suggestion for one issue.
    ///
    /// Fails with `NotConfigured` when no credential is present,
    /// `AllKeysFailed` when every credential was rejected, and
    /// `RequestFailed`/`MalformedResponse` for terminal upstream failures.
    pub async fn suggest(&self, issue: &Issue) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::NotConfigured);
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message {
                role: "user",
                content: build_prompt(issue),
            }],
        };

        let mut last_failure = String::new();
        for (index, key) in self.config.api_keys.iter().enumerate() {
            match self.attempt(key, &request).await {
                KeyOutcome::Success(text) => return Ok(text),
                KeyOutcome::Rotate(reason) => {
                    warn!(key_index = index, %reason, "API key failed, rotating to next");
                    last_failure = reason;
                }
                KeyOutcome::Terminal(err) => return Err(err),
            }
        }

        Err(LlmError::AllKeysFailed(last_failure))
    }

    async fn attempt(&self, api_key: &str, request: &ChatRequest) -> KeyOutcome {
        let response = match self
            .http
            .post(OPENROUTER_URL)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return KeyOutcome::Rotate(format!("transport error: {}", err)),
        };

        let status = response.status();
        if !status.is_success() {
            let detail = truncate_detail(&response.text().await.unwrap_or_default());
            if is_key_scoped(status) {
                return KeyOutcome::Rotate(format!("status {}: {}", status.as_u16(), detail));
            }
            return KeyOutcome::Terminal(LlmError::RequestFailed {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ChatResponse = match response.json().await {
            Ok(body) => body,
            Err(_) => return KeyOutcome::Terminal(LlmError::MalformedResponse),
        };

        match body
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
        {
            Some(content) if !content.trim().is_empty() => {
                KeyOutcome::Success(content.trim().to_string())
            }
            _ => KeyOutcome::Terminal(LlmError::MalformedResponse),
        }
    }
}

impl AiSuggester for SuggestClient {
    async fn suggest(&self, issue: &Issue) -> Result<String, AiSuggestError> {
        match SuggestClient::suggest(self, issue).await {
            Ok(text) => Ok(text),
            Err(LlmError::NotConfigured) => Err(AiSuggestError::NotConfigured),
            Err(other) => Err(AiSuggestError::Upstream(other.to_string())),
        }
    }
}
