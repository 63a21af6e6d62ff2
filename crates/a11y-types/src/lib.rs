//! Shared domain types for the accessibility assistant
//!
//! Everything the HTTP surface exchanges is defined here: issues as
//! submitted by the scanner frontends, suggestions as produced by the
//! heuristic and AI engines, and the screen metadata attached during
//! lesson scans. Wire fields are camelCase to match the existing clients.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Severity {
    /// Fixed presentation order for severity summaries.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
        }
    }

    /// Parse a severity string from a loosely-typed payload, defaulting to
    /// `moderate` for anything unrecognized. Typed request bodies go through
    /// serde instead and reject unknown values.
    pub fn parse_lenient(s: &str) -> Severity {
        s.parse().unwrap_or(Severity::Moderate)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "serious" => Ok(Severity::Serious),
            "moderate" => Ok(Severity::Moderate),
            "minor" => Ok(Severity::Minor),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// Position of an issue within a multi-screen lesson scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    /// 1-based screen number within the lesson.
    pub screen_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A single accessibility or UI/UX issue reported by a scanner.
///
/// Immutable once received; the service never persists it beyond the
/// handling request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub issue_type: String,
    pub issue_description: String,
    /// Raw markup or selector text for the offending element.
    pub element: String,
    pub severity: Severity,
    /// Issue family, e.g. "a11y" or "uiux".
    pub category: String,
    /// Open-ended context supplied by the caller (platform, content type,
    /// lesson metadata).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_info: Option<ScreenInfo>,
}

impl Issue {
    /// Look up a string-valued context field, if present.
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|ctx| ctx.get(key))
            .and_then(|value| value.as_str())
    }
}

/// Which engine produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Heuristic,
    Ai,
}

/// A remediation suggestion as returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub suggestion: String,
    pub timestamp: DateTime<Utc>,
    pub source: SuggestionSource,
    /// Echo of the caller-supplied context, when any was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educational_context: Option<HashMap<String, serde_json::Value>>,
}

impl Suggestion {
    /// Stamp a freshly produced suggestion with the current time.
    pub fn new(
        suggestion: impl Into<String>,
        source: SuggestionSource,
        educational_context: Option<HashMap<String, serde_json::Value>>,
    ) -> Self {
        Self {
            suggestion: suggestion.into(),
            timestamp: Utc::now(),
            source,
            educational_context,
        }
    }
}
