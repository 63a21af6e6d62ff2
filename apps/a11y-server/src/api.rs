//! API handlers for the suggestion server
//!
//! Provides REST endpoints for:
//! - Heuristic and AI suggestions for a single issue
//! - Batch page/lesson analysis
//! - PDF report generation

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use a11y_types::{Issue, ScreenInfo, Severity, Suggestion, SuggestionSource};
use report_engine::{render_report, report_filename, ReportSpec};
use suggest_engine::{
    analyze, heuristic_fingerprint, heuristics, insights::LessonInsights, AnalysisMode,
    EscalationContext,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Service identity response
#[derive(Serialize)]
pub struct ServiceInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub features: FeatureFlags,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub ai_suggestions: bool,
    pub report_generation: bool,
    pub lesson_scan: bool,
}

/// Handler: GET /
pub async fn handle_root(State(state): State<Arc<AppState>>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        name: "AI-Powered Accessibility Assistant",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        features: FeatureFlags {
            ai_suggestions: state.ai_configured(),
            report_generation: true,
            lesson_scan: true,
        },
    })
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub ai_configured: bool,
}

/// Handler: GET /api/health
pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        ai_configured: state.ai_configured(),
    })
}

/// Handler: POST /api/suggest
///
/// Classic heuristic suggestion; always answered from the static table via
/// the cache.
pub async fn handle_suggest(
    State(state): State<Arc<AppState>>,
    Json(issue): Json<Issue>,
) -> Json<Suggestion> {
    let fingerprint = heuristic_fingerprint(&issue);

    if let Some(hit) = state.cache.get(&fingerprint) {
        debug!(%fingerprint, "suggestion cache hit");
        return Json(Suggestion::new(
            hit,
            SuggestionSource::Heuristic,
            issue.context,
        ));
    }

    let text = heuristics::lookup(&issue.category, &issue.issue_type).to_string();
    state.cache.put(fingerprint, text.clone());

    Json(Suggestion::new(
        text,
        SuggestionSource::Heuristic,
        issue.context,
    ))
}

/// Handler: POST /api/ai_suggest
///
/// AI suggestion via the chat-completion upstream. Fails when no credential
/// is configured or every configured key is rejected.
pub async fn handle_ai_suggest(
    State(state): State<Arc<AppState>>,
    Json(issue): Json<Issue>,
) -> Result<Json<Suggestion>, ApiError> {
    let text = state.llm.suggest(&issue).await?;

    Ok(Json(Suggestion::new(
        text,
        SuggestionSource::Ai,
        issue.context,
    )))
}

/// Batch analysis request body. Issues arrive in the scanners' loose shape
/// with per-field defaults rather than the strict `Issue` schema.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default)]
    pub html: String,
    pub issues: Vec<RawIssue>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub lesson_data: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    #[serde(default = "default_issue_type", alias = "type")]
    pub issue_type: String,
    #[serde(default, alias = "issueDescription")]
    pub description: String,
    #[serde(default)]
    pub element: String,
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub context: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub screen_info: Option<ScreenInfo>,
}

fn default_issue_type() -> String {
    "unknown".to_string()
}

fn default_severity() -> String {
    "moderate".to_string()
}

fn default_category() -> String {
    "a11y".to_string()
}

impl RawIssue {
    /// Promote to the typed issue shape, recording the scanned URL in the
    /// context when the caller did not set one.
    fn into_issue(self, url: &str) -> Issue {
        let mut context = self.context.unwrap_or_default();
        context
            .entry("url".to_string())
            .or_insert_with(|| serde_json::Value::String(url.to_string()));

        Issue {
            issue_type: self.issue_type,
            issue_description: self.description,
            element: self.element,
            severity: Severity::parse_lenient(&self.severity),
            category: self.category,
            context: Some(context),
            screen_info: self.screen_info,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub suggestions: BTreeMap<String, String>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
    pub ai_suggestions_count: usize,
    pub heuristic_suggestions_count: usize,
    pub analysis_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_insights: Option<LessonInsights>,
}

/// Handler: POST /api/analyze
///
/// Analyze a full page or lesson and generate a suggestion for every issue.
/// AI escalation is per issue; an upstream failure downgrades that issue to
/// the heuristic path without failing the batch.
pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let total_screens = req
        .lesson_data
        .as_ref()
        .and_then(|data| data.get("totalScreens"))
        .and_then(|v| v.as_u64())
        .map(|n| n as u32);

    let mode = match req.analysis_type.as_deref() {
        Some("lesson_scan") | Some("lesson-scan") | Some("lesson") => {
            AnalysisMode::LessonScan { total_screens }
        }
        _ if req.lesson_data.is_some() => AnalysisMode::LessonScan { total_screens },
        _ => AnalysisMode::Quick,
    };

    let ctx = EscalationContext {
        page_type: req
            .metadata
            .as_ref()
            .and_then(|m| m.get("pageType"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        lesson_scan: matches!(mode, AnalysisMode::LessonScan { .. }),
    };

    let issues: Vec<Issue> = req
        .issues
        .into_iter()
        .map(|raw| raw.into_issue(&req.url))
        .collect();

    info!(
        url = %req.url,
        issues = issues.len(),
        html_bytes = req.html.len(),
        mode = mode.as_str(),
        "analyzing batch"
    );

    let result = analyze(&req.url, &issues, &ctx, mode, &state.cache, &state.llm).await;

    Json(AnalyzeResponse {
        suggestions: result.suggestions,
        summary: result.summary,
        timestamp: Utc::now(),
        ai_suggestions_count: result.ai_count,
        heuristic_suggestions_count: result.heuristic_count,
        analysis_type: mode.as_str().to_string(),
        lesson_insights: result.insights,
    })
}

/// Handler: POST /api/generate_report
///
/// Renders the submitted issues into a PDF and streams it back with a
/// derived download filename. Any rendering failure aborts the whole
/// report.
pub async fn handle_generate_report(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<ReportSpec>,
) -> Result<Response, ApiError> {
    let generated_at = Utc::now();
    let rendered = render_report(&spec, generated_at, state.render_timeout_ms).await?;
    let filename = report_filename(spec.report_type.as_deref(), &spec.url, generated_at);

    info!(%filename, pages = rendered.page_count, "report generated");

    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}
