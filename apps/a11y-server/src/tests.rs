//! Tests for the suggestion server API
//!
//! Endpoint tests run against a real router via axum-test with an
//! unconfigured AI client, so every AI-escalated path exercises the
//! heuristic fallback without touching the network.

#[cfg(test)]
mod http_endpoint_tests {
    use std::sync::Arc;

    use axum::{
        http::StatusCode,
        routing::{get, post},
        Router,
    };
    use axum_test::TestServer;
    use serde_json::json;

    use crate::api::{
        handle_ai_suggest, handle_analyze, handle_generate_report, handle_health, handle_root,
        handle_suggest,
    };
    use crate::state::AppState;
    use llm_client::LlmConfig;

    /// Create a test server with the full router and no AI credential.
    fn create_test_server() -> TestServer {
        let state = Arc::new(AppState::new(LlmConfig::default(), 30000).unwrap());

        let app = Router::new()
            .route("/", get(handle_root))
            .route("/api/health", get(handle_health))
            .route("/api/suggest", post(handle_suggest))
            .route("/api/ai_suggest", post(handle_ai_suggest))
            .route("/api/analyze", post(handle_analyze))
            .route("/api/generate_report", post(handle_generate_report))
            .with_state(state);

        TestServer::new(app).unwrap()
    }

    fn issue_body(severity: &str, issue_type: &str, category: &str) -> serde_json::Value {
        json!({
            "issueType": issue_type,
            "issueDescription": "Observed during scan",
            "element": "<p style=\"color:#999\">text</p>",
            "severity": severity,
            "category": category,
        })
    }

    #[tokio::test]
    async fn root_reports_identity_and_features() {
        let server = create_test_server();
        let response = server.get("/").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "operational");
        assert_eq!(json["features"]["aiSuggestions"], false);
        assert_eq!(json["features"]["reportGeneration"], true);
        assert_eq!(json["features"]["lessonScan"], true);
    }

    #[tokio::test]
    async fn health_returns_200_with_credential_flag() {
        let server = create_test_server();
        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["aiConfigured"], false);
    }

    #[tokio::test]
    async fn suggest_returns_table_advice_for_known_issue() {
        let server = create_test_server();
        let response = server
            .post("/api/suggest")
            .json(&issue_body("serious", "color-contrast", "a11y"))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(
            json["suggestion"],
            "Increase the contrast ratio. Try using a darker text or lighter background."
        );
        assert_eq!(json["source"], "heuristic");
    }

    #[tokio::test]
    async fn suggest_round_trips_identically() {
        let server = create_test_server();
        let body = issue_body("moderate", "image-alt", "a11y");

        let first = server.post("/api/suggest").json(&body).await;
        let second = server.post("/api/suggest").json(&body).await;
        first.assert_status_ok();
        second.assert_status_ok();

        let a = first.json::<serde_json::Value>();
        let b = second.json::<serde_json::Value>();
        assert_eq!(a["suggestion"], b["suggestion"]);
        assert_eq!(a["source"], "heuristic");
        assert_eq!(b["source"], "heuristic");
    }

    #[tokio::test]
    async fn suggest_falls_back_for_unknown_category() {
        let server = create_test_server();
        let response = server
            .post("/api/suggest")
            .json(&issue_body("minor", "anything", "seo"))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(
            json["suggestion"],
            "Review accessibility and UI/UX best practices."
        );
    }

    #[tokio::test]
    async fn suggest_echoes_educational_context() {
        let server = create_test_server();
        let mut body = issue_body("minor", "lcp", "uiux");
        body["context"] = json!({"platform": "mobile"});

        let response = server.post("/api/suggest").json(&body).await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["educationalContext"]["platform"], "mobile");
    }

    #[tokio::test]
    async fn suggest_rejects_malformed_bodies() {
        let server = create_test_server();
        let response = server
            .post("/api/suggest")
            .json(&json!({"issueType": "x", "severity": "catastrophic"}))
            .await;

        let status = response.status_code();
        assert!(status.is_client_error(), "expected 4xx, got {}", status);
    }

    #[tokio::test]
    async fn ai_suggest_without_credential_returns_500() {
        let server = create_test_server();
        let response = server
            .post("/api/ai_suggest")
            .json(&issue_body("critical", "color-contrast", "a11y"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "AI_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn analyze_keys_every_issue_and_counts_sources() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "url": "https://example.com/page",
                "html": "<html></html>",
                "issues": [
                    {"type": "color-contrast", "severity": "critical", "element": "<p/>"},
                    {"type": "image-alt", "severity": "minor", "element": "<img/>"},
                    {"type": "lcp", "severity": "moderate", "category": "uiux"},
                    {"type": "aria-labels", "severity": "moderate"},
                    {"type": "font-size-too-small", "severity": "minor", "category": "uiux"},
                ],
            }))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        let suggestions = json["suggestions"].as_object().unwrap();
        assert_eq!(suggestions.len(), 5);
        for n in 1..=5 {
            assert!(suggestions.contains_key(&format!("issue-{}", n)));
        }
        // No credential: escalated issues fall back, so everything counts
        // as heuristic.
        assert_eq!(json["aiSuggestionsCount"], 0);
        assert_eq!(json["heuristicSuggestionsCount"], 5);
        assert_eq!(json["analysisType"], "quick");
        assert!(json["summary"]
            .as_str()
            .unwrap()
            .contains("https://example.com/page"));
        assert!(json.get("lessonInsights").is_none());
    }

    #[tokio::test]
    async fn analyze_defaults_missing_issue_fields() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "url": "https://example.com",
                "html": "",
                "issues": [{}],
            }))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        // Unknown type in the a11y category resolves to the category default.
        assert_eq!(
            json["suggestions"]["issue-1"],
            "Review WCAG guidelines for accessibility compliance."
        );
    }

    #[tokio::test]
    async fn analyze_lesson_scan_attaches_insights() {
        let server = create_test_server();
        let response = server
            .post("/api/analyze")
            .json(&json!({
                "url": "https://learn.example.edu/lesson/7",
                "html": "",
                "analysisType": "lesson_scan",
                "lessonData": {"totalScreens": 4},
                "issues": [
                    {"type": "color-contrast", "severity": "serious",
                     "screenInfo": {"screenNumber": 1}},
                    {"type": "color-contrast", "severity": "moderate",
                     "screenInfo": {"screenNumber": 2}},
                    {"type": "image-alt", "severity": "minor",
                     "screenInfo": {"screenNumber": 2}},
                ],
            }))
            .await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["analysisType"], "lesson_scan");
        let insights = &json["lessonInsights"];
        assert_eq!(insights["severityHistogram"]["serious"], 1);
        assert_eq!(insights["severityHistogram"]["minor"], 1);
        assert_eq!(insights["issuesPerScreen"]["2"], 2);
        assert_eq!(insights["averageIssuesPerScreen"], 0.75);
    }

    #[tokio::test]
    async fn generate_report_streams_a_pdf_with_derived_filename() {
        let server = create_test_server();
        let response = server
            .post("/api/generate_report")
            .json(&json!({
                "url": "https://example.com/page",
                "includeAiSuggestions": true,
                "issues": [
                    {"issueType": "color-contrast", "severity": "critical",
                     "description": "Contrast too low", "element": "<p/>",
                     "suggestion": "Darken the text."},
                    {"issueType": "image-alt", "severity": "minor",
                     "description": "Missing alt text", "element": "<img/>"},
                ],
            }))
            .await;
        response.assert_status_ok();

        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/pdf"
        );
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("accessibility-audit-example.com"));
        assert!(disposition.ends_with(".pdf\""));

        assert!(response.as_bytes().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn generate_report_rejects_bodies_without_url() {
        let server = create_test_server();
        let response = server
            .post("/api/generate_report")
            .json(&json!({"issues": []}))
            .await;

        let status = response.status_code();
        assert!(status.is_client_error(), "expected 4xx, got {}", status);
    }
}

#[cfg(test)]
mod property_tests {
    //! Property tests for request-level parsing helpers

    use proptest::prelude::*;

    use a11y_types::Severity;
    use report_engine::report_filename;

    proptest! {
        /// Lenient severity parsing is total and lands on a known label.
        #[test]
        fn lenient_severity_is_total(raw in ".{0,30}") {
            let severity = Severity::parse_lenient(&raw);
            prop_assert!(Severity::ALL.contains(&severity));
        }

        /// Derived report filenames are always well-formed attachments.
        #[test]
        fn report_filenames_are_well_formed(
            report_type in proptest::option::of("[A-Za-z ]{1,12}"),
            url in ".{0,60}",
        ) {
            let at = "2026-02-01T09:30:15Z".parse().unwrap();
            let filename = report_filename(report_type.as_deref(), &url, at);
            prop_assert!(filename.starts_with("accessibility-"));
            prop_assert!(filename.ends_with(".pdf"));
            prop_assert!(!filename.contains('"'));
            prop_assert!(!filename.contains(' '));
        }
    }
}
