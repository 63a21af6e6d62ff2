//! Prompt construction
//!
//! The prompt is deliberately terse: issue fields are truncated to fixed
//! character budgets before being embedded, bounding both token cost and
//! upstream latency.

use a11y_types::Issue;

/// Character budget for the issue description.
pub const MAX_DESCRIPTION_CHARS: usize = 100;

/// Character budget for the raw element markup.
pub const MAX_ELEMENT_CHARS: usize = 80;

/// Truncate on a character boundary, appending an ellipsis marker when
/// anything was cut.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('\u{2026}');
    out
}

/// Compose the chat instruction for one issue, including any contextual
/// hints the caller supplied.
pub fn build_prompt(issue: &Issue) -> String {
    let description = truncate_chars(&issue.issue_description, MAX_DESCRIPTION_CHARS);
    let element = truncate_chars(&issue.element, MAX_ELEMENT_CHARS);

    let mut prompt = format!(
        "You are an accessibility and UI/UX expert. Give a very brief fix (under 30 words).\n\
         Issue Type: {}\n\
         Severity: {}\n\
         Description (short): {}\n\
         HTML Element (short): {}\n",
        issue.issue_type, issue.severity, description, element
    );

    if let Some(platform) = issue.context_str("platform") {
        prompt.push_str(&format!("Platform: {}\n", platform));
    }
    if let Some(content_type) = issue.context_str("contentType") {
        prompt.push_str(&format!("Content Type: {}\n", content_type));
    }
    if let Some(screen) = &issue.screen_info {
        prompt.push_str(&format!("Lesson Screen: {}\n", screen.screen_number));
    }

    prompt.push_str("Return only the recommendation.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn issue(description: &str, element: &str) -> Issue {
        serde_json::from_value(serde_json::json!({
            "issueType": "color-contrast",
            "issueDescription": description,
            "element": element,
            "severity": "serious",
            "category": "a11y",
        }))
        .unwrap()
    }

    #[test]
    fn short_fields_pass_through_unchanged() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn long_fields_are_cut_with_ellipsis() {
        let cut = truncate_chars(&"a".repeat(120), MAX_DESCRIPTION_CHARS);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS + 1);
        assert!(cut.ends_with('\u{2026}'));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Multibyte input must not split a codepoint.
        let emoji = "\u{1f600}".repeat(90);
        let cut = truncate_chars(&emoji, MAX_ELEMENT_CHARS);
        assert_eq!(cut.chars().count(), MAX_ELEMENT_CHARS + 1);
    }

    #[test]
    fn prompt_embeds_issue_fields() {
        let prompt = build_prompt(&issue("low contrast text", "<p>x</p>"));
        assert!(prompt.contains("Issue Type: color-contrast"));
        assert!(prompt.contains("Severity: serious"));
        assert!(prompt.contains("low contrast text"));
        assert!(prompt.contains("<p>x</p>"));
        assert!(prompt.ends_with("Return only the recommendation."));
    }

    #[test]
    fn prompt_truncates_oversized_fields() {
        let prompt = build_prompt(&issue(&"d".repeat(300), &"e".repeat(300)));
        assert!(prompt.contains(&format!("{}\u{2026}", "d".repeat(MAX_DESCRIPTION_CHARS))));
        assert!(prompt.contains(&format!("{}\u{2026}", "e".repeat(MAX_ELEMENT_CHARS))));
        assert!(!prompt.contains(&"d".repeat(MAX_DESCRIPTION_CHARS + 1)));
    }

    #[test]
    fn prompt_includes_contextual_hints_when_present() {
        let mut subject = issue("desc", "<p/>");
        subject.context = serde_json::from_value(
            serde_json::json!({"platform": "mobile", "contentType": "quiz"}),
        )
        .ok();
        subject.screen_info =
            serde_json::from_value(serde_json::json!({"screenNumber": 4})).ok();

        let prompt = build_prompt(&subject);
        assert!(prompt.contains("Platform: mobile"));
        assert!(prompt.contains("Content Type: quiz"));
        assert!(prompt.contains("Lesson Screen: 4"));
    }
}
