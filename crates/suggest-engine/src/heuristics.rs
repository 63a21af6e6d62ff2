//! Static heuristic advice table
//!
//! A nested mapping from issue category to issue type to a fixed remediation
//! string. Lookups never fail: unknown issue types fall back to the
//! category's default row, and unknown categories fall back to a single
//! global default.

/// Advice returned when neither the category nor the issue type is known.
pub const GLOBAL_DEFAULT: &str = "Review accessibility and UI/UX best practices.";

/// Per-category advice tables. The "default" row is the category fallback.
const TABLE: &[(&str, &[(&str, &str)])] = &[
    (
        "a11y",
        &[
            (
                "color-contrast",
                "Increase the contrast ratio. Try using a darker text or lighter background.",
            ),
            (
                "image-alt",
                "Add alt text to images describing their function.",
            ),
            (
                "default",
                "Review WCAG guidelines for accessibility compliance.",
            ),
        ],
    ),
    (
        "uiux",
        &[
            (
                "touch-target-size",
                "Increase touch target to at least 44\u{d7}44 px so users can tap easily.",
            ),
            (
                "font-size-too-small",
                "Boost text size to at least 16 px for readability.",
            ),
            (
                "viewport-width",
                "Ensure content fits within the viewport to avoid horizontal scrolling.",
            ),
            (
                "layout-shift",
                "Reduce layout shifts by reserving image space and avoiding late DOM changes.",
            ),
            (
                "lcp",
                "Optimize largest contentful paint by deferring unused CSS and images.",
            ),
            (
                "inp",
                "Improve interactivity by reducing JavaScript blocking time below 200 ms.",
            ),
            (
                "default",
                "Follow platform UI/UX guidelines to ensure a smooth user experience.",
            ),
        ],
    ),
];

/// Look up the canned advice for a (category, issue type) pair.
///
/// Fallback order: exact match, category default, global default. Pure and
/// total — always returns a non-empty string.
pub fn lookup(category: &str, issue_type: &str) -> &'static str {
    let Some((_, rows)) = TABLE.iter().find(|(name, _)| *name == category) else {
        return GLOBAL_DEFAULT;
    };

    rows.iter()
        .find(|(key, _)| *key == issue_type)
        .or_else(|| rows.iter().find(|(key, _)| *key == "default"))
        .map(|(_, advice)| *advice)
        .unwrap_or(GLOBAL_DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_match_wins() {
        assert_eq!(
            lookup("a11y", "image-alt"),
            "Add alt text to images describing their function."
        );
        assert_eq!(
            lookup("uiux", "lcp"),
            "Optimize largest contentful paint by deferring unused CSS and images."
        );
    }

    #[test]
    fn unknown_issue_type_falls_back_to_category_default() {
        assert_eq!(
            lookup("a11y", "aria-labels"),
            "Review WCAG guidelines for accessibility compliance."
        );
    }

    #[test]
    fn unknown_category_falls_back_to_global_default() {
        assert_eq!(lookup("seo", "color-contrast"), GLOBAL_DEFAULT);
        assert_eq!(lookup("", ""), GLOBAL_DEFAULT);
    }

    proptest! {
        /// lookup is total: any input pair yields a non-empty string.
        #[test]
        fn lookup_always_returns_advice(category in ".{0,30}", issue_type in ".{0,30}") {
            prop_assert!(!lookup(&category, &issue_type).is_empty());
        }

        /// Unknown issue types within a known category always hit that
        /// category's default row.
        #[test]
        fn unknown_type_hits_category_default(issue_type in "[a-z-]{1,20}") {
            prop_assume!(!matches!(issue_type.as_str(), "color-contrast" | "image-alt" | "default"));
            prop_assert_eq!(
                lookup("a11y", &issue_type),
                "Review WCAG guidelines for accessibility compliance."
            );
        }
    }
}
