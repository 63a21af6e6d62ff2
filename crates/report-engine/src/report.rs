//! Report entry point
//!
//! Binds the pure layout to the embedded Typst template and derives the
//! download filename.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::Url;

use crate::compiler::{compile_pdf, RenderedReport, ReportError};
use crate::layout::{build_layout, ReportSpec};

/// The audit report template, embedded at compile time.
const REPORT_TEMPLATE: &str = include_str!("../templates/report.typ");

/// Render one report to PDF bytes.
///
/// Deterministic for a given spec and `generated_at`; any failure aborts
/// the whole report — there is no partial output.
pub async fn render_report(
    spec: &ReportSpec,
    generated_at: DateTime<Utc>,
    timeout_ms: u64,
) -> Result<RenderedReport, ReportError> {
    let layout = build_layout(spec, generated_at);
    let layout_json =
        serde_json::to_value(&layout).map_err(|e| ReportError::InvalidInput(e.to_string()))?;

    let mut inputs = HashMap::new();
    inputs.insert("report".to_string(), layout_json);

    compile_pdf(REPORT_TEMPLATE.to_string(), inputs, generated_at, timeout_ms).await
}

/// Derive the download filename:
/// `accessibility-<type>-<domain>_<timestamp>.pdf`.
pub fn report_filename(report_type: Option<&str>, url: &str, at: DateTime<Utc>) -> String {
    let kind = sanitize_component(report_type.unwrap_or("audit"), "audit");
    let domain = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| sanitize_component(h, "site")))
        .unwrap_or_else(|| "site".to_string());

    format!(
        "accessibility-{}-{}_{}.pdf",
        kind,
        domain,
        at.format("%Y%m%d-%H%M%S")
    )
}

fn sanitize_component(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('-').to_string();

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
