//! Application state shared across requests

use anyhow::Result;
use llm_client::{LlmConfig, SuggestClient};
use suggest_engine::SuggestionCache;
use tracing::warn;

pub struct AppState {
    /// Process-lifetime suggestion cache; the only cross-request state.
    pub cache: SuggestionCache,
    pub llm: SuggestClient,
    pub render_timeout_ms: u64,
}

impl AppState {
    pub fn new(llm_config: LlmConfig, render_timeout_ms: u64) -> Result<Self> {
        if !llm_config.is_configured() {
            warn!("OPENROUTER_API_KEY not set; AI endpoints will return configuration errors");
        }

        Ok(Self {
            cache: SuggestionCache::new(),
            llm: SuggestClient::new(llm_config)?,
            render_timeout_ms,
        })
    }

    pub fn ai_configured(&self) -> bool {
        self.llm.is_configured()
    }
}
