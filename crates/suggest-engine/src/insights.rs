//! Lesson-scan aggregate insights
//!
//! Computed over a whole batch when the caller requests a lesson scan:
//! severity histogram, most frequent issue types, per-screen density, and a
//! short list of recommendations driven by fixed thresholds. The thresholds
//! are policy constants, not derived statistics.

use std::collections::BTreeMap;

use a11y_types::{Issue, Severity};
use serde::Serialize;

/// More than this many contrast issues across a lesson triggers a palette
/// review recommendation.
pub const CONTRAST_RECOMMENDATION_THRESHOLD: usize = 2;

/// Average issues-per-screen above this triggers a density recommendation.
pub const SCREEN_DENSITY_THRESHOLD: f64 = 3.0;

/// How many issue types the frequency list keeps.
const TOP_ISSUE_TYPES: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTypeCount {
    pub issue_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonInsights {
    /// Count per severity label, all four labels always present.
    pub severity_histogram: BTreeMap<String, usize>,
    /// Most frequent issue types, descending, capped at five.
    pub top_issue_types: Vec<IssueTypeCount>,
    /// Issue count per screen number; issues without screen info land on
    /// screen 0.
    pub issues_per_screen: BTreeMap<u32, usize>,
    pub average_issues_per_screen: f64,
    pub recommendations: Vec<String>,
}

pub fn compute(issues: &[Issue], total_screens: Option<u32>) -> LessonInsights {
    let mut severity_histogram: BTreeMap<String, usize> = Severity::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut issues_per_screen: BTreeMap<u32, usize> = BTreeMap::new();

    for issue in issues {
        *severity_histogram
            .entry(issue.severity.as_str().to_string())
            .or_insert(0) += 1;
        *type_counts.entry(issue.issue_type.as_str()).or_insert(0) += 1;

        let screen = issue
            .screen_info
            .as_ref()
            .map(|info| info.screen_number)
            .unwrap_or(0);
        *issues_per_screen.entry(screen).or_insert(0) += 1;
    }

    let mut top_issue_types: Vec<IssueTypeCount> = type_counts
        .iter()
        .map(|(issue_type, count)| IssueTypeCount {
            issue_type: issue_type.to_string(),
            count: *count,
        })
        .collect();
    // Descending by count; the BTreeMap source already fixed the tie order.
    top_issue_types.sort_by(|a, b| b.count.cmp(&a.count));
    top_issue_types.truncate(TOP_ISSUE_TYPES);

    // Prefer the lesson's declared screen count; otherwise the screens that
    // actually reported issues.
    let screen_count = total_screens
        .map(|n| n as usize)
        .filter(|n| *n > 0)
        .unwrap_or_else(|| issues_per_screen.len().max(1));
    let average_issues_per_screen = issues.len() as f64 / screen_count as f64;

    let recommendations = recommendations(
        issues,
        &severity_histogram,
        average_issues_per_screen,
    );

    LessonInsights {
        severity_histogram,
        top_issue_types,
        issues_per_screen,
        average_issues_per_screen,
        recommendations,
    }
}

fn recommendations(
    issues: &[Issue],
    severity_histogram: &BTreeMap<String, usize>,
    average_issues_per_screen: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    let critical = severity_histogram
        .get(Severity::Critical.as_str())
        .copied()
        .unwrap_or(0);
    if critical > 0 {
        out.push(format!(
            "Resolve the {} critical issue(s) before publishing this lesson.",
            critical
        ));
    }

    let contrast_issues = issues
        .iter()
        .filter(|issue| issue.issue_type == "color-contrast")
        .count();
    if contrast_issues > CONTRAST_RECOMMENDATION_THRESHOLD {
        out.push(
            "Multiple contrast failures found; review the lesson's color palette as a whole."
                .to_string(),
        );
    }

    if average_issues_per_screen > SCREEN_DENSITY_THRESHOLD {
        out.push(
            "High issue density per screen; consider an accessibility pass on the lesson template."
                .to_string(),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn issue(severity: &str, issue_type: &str, screen: Option<u32>) -> Issue {
        let mut value = serde_json::json!({
            "issueType": issue_type,
            "issueDescription": "desc",
            "element": "<div></div>",
            "severity": severity,
            "category": "a11y",
        });
        if let Some(n) = screen {
            value["screenInfo"] = serde_json::json!({"screenNumber": n});
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn histogram_always_has_all_four_labels() {
        let insights = compute(&[issue("critical", "image-alt", None)], None);
        assert_eq!(insights.severity_histogram.len(), 4);
        assert_eq!(insights.severity_histogram["critical"], 1);
        assert_eq!(insights.severity_histogram["minor"], 0);
    }

    #[test]
    fn top_issue_types_sorted_and_capped() {
        let mut issues = Vec::new();
        for (issue_type, n) in [("a", 1), ("b", 4), ("c", 2), ("d", 3), ("e", 1), ("f", 5)] {
            for _ in 0..n {
                issues.push(issue("minor", issue_type, None));
            }
        }

        let insights = compute(&issues, None);
        assert_eq!(insights.top_issue_types.len(), 5);
        assert_eq!(insights.top_issue_types[0].issue_type, "f");
        assert_eq!(insights.top_issue_types[0].count, 5);
        assert_eq!(insights.top_issue_types[1].issue_type, "b");
    }

    #[test]
    fn screen_density_uses_declared_screen_count() {
        let issues = vec![
            issue("minor", "lcp", Some(1)),
            issue("minor", "lcp", Some(1)),
            issue("minor", "lcp", Some(2)),
        ];

        let by_observed = compute(&issues, None);
        assert_eq!(by_observed.average_issues_per_screen, 1.5);
        assert_eq!(by_observed.issues_per_screen[&1], 2);

        let by_declared = compute(&issues, Some(6));
        assert_eq!(by_declared.average_issues_per_screen, 0.5);
    }

    #[test]
    fn contrast_recommendation_requires_more_than_threshold() {
        let two = vec![
            issue("minor", "color-contrast", None),
            issue("minor", "color-contrast", None),
        ];
        assert!(!compute(&two, None)
            .recommendations
            .iter()
            .any(|r| r.contains("contrast")));

        let three = vec![
            issue("minor", "color-contrast", None),
            issue("minor", "color-contrast", None),
            issue("minor", "color-contrast", None),
        ];
        assert!(compute(&three, None)
            .recommendations
            .iter()
            .any(|r| r.contains("contrast")));
    }

    #[test]
    fn density_recommendation_fires_above_threshold() {
        // 7 issues on 2 screens: 3.5 per screen.
        let issues: Vec<Issue> = (0..7)
            .map(|i| issue("minor", "lcp", Some(if i < 4 { 1 } else { 2 })))
            .collect();
        let insights = compute(&issues, None);
        assert!(insights
            .recommendations
            .iter()
            .any(|r| r.contains("density")));
    }

    #[test]
    fn empty_batch_is_well_defined() {
        let insights = compute(&[], None);
        assert_eq!(insights.average_issues_per_screen, 0.0);
        assert!(insights.top_issue_types.is_empty());
        assert!(insights.recommendations.is_empty());
    }
}
