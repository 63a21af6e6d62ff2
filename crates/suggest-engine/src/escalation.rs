//! Escalation policy
//!
//! Decides, per issue, whether to ask the AI backend for a tailored
//! suggestion or to answer from the static heuristic table. Pure and
//! deterministic; rules are evaluated in order and the first match wins.

use a11y_types::{Issue, Severity};

/// Issue types whose remediation is too context-dependent for canned advice
/// even at moderate severity.
pub const COMPLEX_ISSUE_TYPES: &[&str] = &[
    "aria-labels",
    "keyboard-navigation",
    "focus-management",
    "table-headers",
    "heading-structure",
    "error-identification",
];

/// Page types where moderate issues still warrant AI attention because the
/// content is graded.
const ESCALATED_PAGE_TYPES: &[&str] = &["assessment", "assignment"];

/// Contextual flags consulted by the escalation policy, resolved once per
/// batch from the request metadata.
#[derive(Debug, Clone, Default)]
pub struct EscalationContext {
    pub page_type: Option<String>,
    /// True when the batch is a multi-screen lesson scan.
    pub lesson_scan: bool,
}

/// Decide whether `issue` should be routed to the AI backend.
///
/// Rule order:
/// 1. critical or serious severity
/// 2. moderate severity on a complex issue type
/// 3. moderate severity on assessment/assignment content
/// 4. lesson-scan mode for anything above minor
pub fn should_escalate(issue: &Issue, ctx: &EscalationContext) -> bool {
    if matches!(issue.severity, Severity::Critical | Severity::Serious) {
        return true;
    }

    if issue.severity == Severity::Moderate
        && COMPLEX_ISSUE_TYPES.contains(&issue.issue_type.as_str())
    {
        return true;
    }

    let page_type = ctx
        .page_type
        .as_deref()
        .or_else(|| issue.context_str("pageType"));
    if issue.severity == Severity::Moderate
        && page_type.is_some_and(|pt| ESCALATED_PAGE_TYPES.contains(&pt))
    {
        return true;
    }

    if ctx.lesson_scan && issue.severity != Severity::Minor {
        return true;
    }

    false
}
