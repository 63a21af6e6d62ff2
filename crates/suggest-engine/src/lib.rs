//! Suggestion engine for accessibility and UI/UX issues
//!
//! This crate holds the decision logic of the service, kept free of any
//! HTTP or upstream-provider concern so it can be unit-tested in isolation:
//!
//! - Static heuristic advice table with category fallbacks
//! - Process-lifetime suggestion cache keyed by content fingerprints
//! - Escalation policy deciding heuristic vs AI per issue
//! - Batch analyzer with per-issue fallback and lesson insights

pub mod analyzer;
pub mod cache;
pub mod escalation;
pub mod heuristics;
pub mod insights;

pub use analyzer::{analyze, AiSuggestError, AiSuggester, AnalysisMode, AnalysisResult};
pub use cache::{ai_fingerprint, heuristic_fingerprint, SuggestionCache};
pub use escalation::{should_escalate, EscalationContext};
pub use heuristics::lookup;
pub use insights::LessonInsights;
