//! Batch analyzer
//!
//! Walks a submitted list of issues in input order, routes each one through
//! the escalation policy, and assembles per-issue suggestions plus summary
//! statistics. A failing AI call downgrades that one issue to the heuristic
//! path; it never aborts the batch.

use std::collections::BTreeMap;

use a11y_types::{Issue, SuggestionSource};
use thiserror::Error;
use tracing::warn;

use crate::cache::{ai_fingerprint, heuristic_fingerprint, SuggestionCache};
use crate::escalation::{should_escalate, EscalationContext};
use crate::heuristics;
use crate::insights::{self, LessonInsights};

/// Failure surfaced by an AI suggestion backend. The analyzer treats every
/// variant as recoverable; the distinction only drives log detail.
#[derive(Debug, Error)]
pub enum AiSuggestError {
    #[error("no AI credential configured")]
    NotConfigured,
    #[error("{0}")]
    Upstream(String),
}

/// Backend capable of producing an AI suggestion for a single issue.
///
/// The seam exists so the analyzer's fallback branch can be exercised in
/// tests with a scripted backend instead of a live provider.
pub trait AiSuggester: Send + Sync {
    fn suggest(
        &self,
        issue: &Issue,
    ) -> impl std::future::Future<Output = Result<String, AiSuggestError>> + Send;
}

/// How a batch should be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Single-page quick scan.
    Quick,
    /// Multi-screen lesson scan; computes aggregate insights.
    LessonScan { total_screens: Option<u32> },
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Quick => "quick",
            AnalysisMode::LessonScan { .. } => "lesson_scan",
        }
    }
}

/// Outcome of analyzing one batch. Derived per request, never stored.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Suggestion text keyed by 1-based positional key ("issue-1", ...).
    pub suggestions: BTreeMap<String, String>,
    pub summary: String,
    pub ai_count: usize,
    pub heuristic_count: usize,
    pub insights: Option<LessonInsights>,
}

/// Per-issue resolution, kept explicit so the fallback decision is a
/// visible branch rather than an exception path.
enum Resolution {
    Ai(String),
    Heuristic(String),
    /// The AI path was chosen but failed; the heuristic text stands in.
    Fallback(String),
}

pub async fn analyze<A: AiSuggester>(
    url: &str,
    issues: &[Issue],
    ctx: &EscalationContext,
    mode: AnalysisMode,
    cache: &SuggestionCache,
    ai: &A,
) -> AnalysisResult {
    let mut suggestions = BTreeMap::new();
    let mut ai_count = 0;
    let mut heuristic_count = 0;

    for (index, issue) in issues.iter().enumerate() {
        let resolution = resolve(issue, ctx, cache, ai).await;
        let (text, source) = match resolution {
            Resolution::Ai(text) => (text, SuggestionSource::Ai),
            Resolution::Heuristic(text) | Resolution::Fallback(text) => {
                (text, SuggestionSource::Heuristic)
            }
        };

        match source {
            SuggestionSource::Ai => ai_count += 1,
            SuggestionSource::Heuristic => heuristic_count += 1,
        }
        suggestions.insert(format!("issue-{}", index + 1), text);
    }

    let insights = match mode {
        AnalysisMode::Quick => None,
        AnalysisMode::LessonScan { total_screens } => {
            Some(insights::compute(issues, total_screens))
        }
    };

    AnalysisResult {
        suggestions,
        summary: format!("Analysis completed for {}. Found {} issues.", url, issues.len()),
        ai_count,
        heuristic_count,
        insights,
    }
}

async fn resolve<A: AiSuggester>(
    issue: &Issue,
    ctx: &EscalationContext,
    cache: &SuggestionCache,
    ai: &A,
) -> Resolution {
    if !should_escalate(issue, ctx) {
        return Resolution::Heuristic(cached_heuristic(issue, cache));
    }

    let fingerprint = ai_fingerprint(issue);
    if let Some(hit) = cache.get(&fingerprint) {
        return Resolution::Ai(hit);
    }

    match ai.suggest(issue).await {
        Ok(text) => {
            cache.put(fingerprint, text.clone());
            Resolution::Ai(text)
        }
        Err(err) => {
            warn!(
                issue_type = %issue.issue_type,
                severity = %issue.severity,
                error = %err,
                "AI suggestion failed, falling back to heuristic"
            );
            Resolution::Fallback(cached_heuristic(issue, cache))
        }
    }
}

fn cached_heuristic(issue: &Issue, cache: &SuggestionCache) -> String {
    cache.get_or_insert_with(&heuristic_fingerprint(issue), || {
        heuristics::lookup(&issue.category, &issue.issue_type).to_string()
    })
}
