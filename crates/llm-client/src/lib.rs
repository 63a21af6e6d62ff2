//! Chat-completion client for AI remediation suggestions
//!
//! Wraps the OpenRouter chat-completion endpoint behind a single
//! `suggest(issue) -> text` call. Prompts are built from the issue fields
//! with hard character budgets so a pathological element dump cannot blow up
//! request cost. When several API keys are configured they are tried in
//! order — a linear rotation for per-key rate limits, not a retry loop.

mod client;
mod prompt;

pub use client::{LlmConfig, SuggestClient};
pub use prompt::{build_prompt, MAX_DESCRIPTION_CHARS, MAX_ELEMENT_CHARS};

use thiserror::Error;

/// Failures surfaced by the suggestion client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured")]
    NotConfigured,

    #[error("upstream request failed with status {status}: {detail}")]
    RequestFailed { status: u16, detail: String },

    #[error("upstream response missing expected chat completion shape")]
    MalformedResponse,

    #[error("all configured API keys failed: {0}")]
    AllKeysFailed(String),

    #[error("failed to build HTTP client: {0}")]
    Http(String),
}
