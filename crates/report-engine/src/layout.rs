//! Report layout
//!
//! Pure transformation from a report spec to the document structure the
//! Typst template consumes: metadata rows, severity summary, issue
//! sections, grouping and forced page breaks. Deterministic for a given
//! spec and generation timestamp, so every pagination rule is unit-testable
//! without compiling a document.

use std::collections::{BTreeMap, HashMap};

use a11y_types::{ScreenInfo, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat reports force a page break after this many issue sections.
pub const ISSUES_PER_PAGE: usize = 3;

/// Grouped reports force a page break after this many screen groups.
pub const SCREENS_PER_PAGE: usize = 2;

/// Element markup shown in a detail table is cut at this many characters.
pub const ELEMENT_DISPLAY_CHARS: usize = 120;

const DEFAULT_TITLE: &str = "Accessibility Audit Report";
const FOOTER: &str = "Generated by the Accessibility Assistant";

fn default_true() -> bool {
    true
}

fn default_severity() -> String {
    Severity::Moderate.as_str().to_string()
}

/// Input for one report, as posted by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSpec {
    pub url: String,
    pub issues: Vec<ReportIssue>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    #[serde(default = "default_true")]
    pub include_ai_suggestions: bool,
    #[serde(default)]
    pub report_title: Option<String>,
    #[serde(default)]
    pub report_type: Option<String>,
    /// Per-screen rollups; presence switches the report to grouped mode.
    #[serde(default)]
    pub screen_breakdown: Option<Vec<ScreenRollup>>,
}

/// Issue shape accepted for reports: the scan issue fields plus the
/// previously computed suggestion, with the loose key spellings the
/// frontends use.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIssue {
    #[serde(alias = "type")]
    pub issue_type: String,
    #[serde(default, alias = "issueDescription")]
    pub description: String,
    #[serde(default)]
    pub element: String,
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub suggestion_source: Option<String>,
    #[serde(default)]
    pub screen_info: Option<ScreenInfo>,
}

/// One screen's rollup within a lesson report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenRollup {
    pub screen_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub issue_count: Option<usize>,
}

/// Structure handed to the Typst template via `sys.inputs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLayout {
    pub title: String,
    pub url: String,
    pub generated_at: String,
    pub metadata_rows: Vec<[String; 2]>,
    pub severity_rows: Vec<SeverityRow>,
    pub groups: Vec<SectionGroup>,
    pub footer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityRow {
    pub label: String,
    pub count: usize,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup {
    /// Screen heading in grouped mode; absent for flat reports.
    pub heading: Option<String>,
    pub sections: Vec<IssueSection>,
    pub break_after: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSection {
    pub number: usize,
    pub title: String,
    pub severity: String,
    pub issue_type: String,
    pub element: String,
    pub selector: Option<String>,
    pub description: String,
    pub suggestion: Option<String>,
    pub suggestion_source: String,
    pub break_after: bool,
}

/// Static impact text shown next to each severity row.
pub fn impact_description(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => {
            "Blocks access to content or functionality for assistive technology users."
        }
        Severity::Serious => {
            "Causes significant barriers or frustration for users with disabilities."
        }
        Severity::Moderate => "Degrades the experience for some users; workarounds exist.",
        Severity::Minor => "Cosmetic or best-practice gap with limited user impact.",
    }
}

/// Compute the full document structure for one report.
pub fn build_layout(spec: &ReportSpec, generated_at: DateTime<Utc>) -> ReportLayout {
    let title = spec
        .report_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let groups = match &spec.screen_breakdown {
        Some(breakdown) => grouped_sections(spec, breakdown),
        None => flat_sections(spec),
    };

    ReportLayout {
        title,
        url: spec.url.clone(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        metadata_rows: metadata_rows(spec, generated_at),
        severity_rows: severity_summary(&spec.issues),
        groups,
        footer: FOOTER.to_string(),
    }
}

fn metadata_rows(spec: &ReportSpec, generated_at: DateTime<Utc>) -> Vec<[String; 2]> {
    let meta_str = |key: &str| -> String {
        spec.metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("\u{2014}")
            .to_string()
    };

    vec![
        ["URL".to_string(), spec.url.clone()],
        ["Platform".to_string(), meta_str("platform")],
        ["Content type".to_string(), meta_str("contentType")],
        [
            "Scan date".to_string(),
            generated_at.format("%Y-%m-%d").to_string(),
        ],
        ["Issues found".to_string(), spec.issues.len().to_string()],
    ]
}

/// Severity rows in fixed order, every row present even at count zero.
pub fn severity_summary(issues: &[ReportIssue]) -> Vec<SeverityRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for issue in issues {
        let severity = Severity::parse_lenient(&issue.severity);
        *counts.entry(severity.as_str()).or_insert(0) += 1;
    }

    Severity::ALL
        .iter()
        .map(|severity| SeverityRow {
            label: severity.as_str().to_string(),
            count: counts.get(severity.as_str()).copied().unwrap_or(0),
            impact: impact_description(*severity).to_string(),
        })
        .collect()
}

fn flat_sections(spec: &ReportSpec) -> Vec<SectionGroup> {
    let total = spec.issues.len();
    let sections = spec
        .issues
        .iter()
        .enumerate()
        .map(|(index, issue)| {
            let number = index + 1;
            let break_after = number % ISSUES_PER_PAGE == 0 && number < total;
            issue_section(issue, number, break_after, spec.include_ai_suggestions)
        })
        .collect();

    vec![SectionGroup {
        heading: None,
        sections,
        break_after: false,
    }]
}

fn grouped_sections(spec: &ReportSpec, breakdown: &[ScreenRollup]) -> Vec<SectionGroup> {
    // Bucket by screen number; issues without screen info trail the lesson.
    let mut buckets: BTreeMap<u32, Vec<&ReportIssue>> = BTreeMap::new();
    let mut ungrouped: Vec<&ReportIssue> = Vec::new();
    for issue in &spec.issues {
        match &issue.screen_info {
            Some(info) => buckets.entry(info.screen_number).or_default().push(issue),
            None => ungrouped.push(issue),
        }
    }

    let titles: HashMap<u32, &str> = breakdown
        .iter()
        .map(|rollup| (rollup.screen_number, rollup.title.as_str()))
        .collect();

    let mut groups: Vec<SectionGroup> = Vec::new();
    let mut number = 0;

    for (screen, issues) in &buckets {
        let heading = match titles.get(screen).filter(|t| !t.is_empty()) {
            Some(title) => format!("Screen {}: {}", screen, title),
            None => issues
                .iter()
                .find_map(|i| i.screen_info.as_ref())
                .filter(|info| !info.title.is_empty())
                .map(|info| format!("Screen {}: {}", screen, info.title))
                .unwrap_or_else(|| format!("Screen {}", screen)),
        };

        groups.push(SectionGroup {
            heading: Some(heading),
            sections: issues
                .iter()
                .map(|issue| {
                    number += 1;
                    issue_section(issue, number, false, spec.include_ai_suggestions)
                })
                .collect(),
            break_after: false,
        });
    }

    if !ungrouped.is_empty() {
        groups.push(SectionGroup {
            heading: Some("Other issues".to_string()),
            sections: ungrouped
                .iter()
                .map(|issue| {
                    number += 1;
                    issue_section(issue, number, false, spec.include_ai_suggestions)
                })
                .collect(),
            break_after: false,
        });
    }

    let total = groups.len();
    for (index, group) in groups.iter_mut().enumerate() {
        group.break_after = (index + 1) % SCREENS_PER_PAGE == 0 && index + 1 < total;
    }

    groups
}

fn issue_section(
    issue: &ReportIssue,
    number: usize,
    break_after: bool,
    include_suggestions: bool,
) -> IssueSection {
    let severity = Severity::parse_lenient(&issue.severity);
    let suggestion = if include_suggestions {
        issue.suggestion.clone().filter(|s| !s.trim().is_empty())
    } else {
        None
    };
    let suggestion_source = issue
        .suggestion_source
        .clone()
        .unwrap_or_else(|| "heuristic".to_string());

    IssueSection {
        number,
        title: format!("Issue {}: {}", number, issue.issue_type),
        severity: severity.as_str().to_string(),
        issue_type: issue.issue_type.clone(),
        element: truncate_display(&issue.element, ELEMENT_DISPLAY_CHARS),
        selector: issue.selector.clone().filter(|s| !s.is_empty()),
        description: issue.description.clone(),
        suggestion,
        suggestion_source,
        break_after,
    }
}

fn truncate_display(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('\u{2026}');
    out
}
