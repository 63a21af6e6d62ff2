//! Accessibility Suggestion Server
//!
//! HTTP microservice turning accessibility/UI-UX issue reports into
//! human-readable remediation suggestions. Provides REST API endpoints for:
//!
//! - Heuristic suggestions with a process-lifetime cache
//! - AI suggestions via a chat-completion upstream (optional, key-gated)
//! - Batch page/lesson analysis with per-issue AI escalation
//! - PDF audit report generation
//!
//! ## Architecture
//!
//! Handlers stay thin: decision logic lives in `suggest-engine`, upstream
//! calls in `llm-client`, and document rendering in `report-engine`. The
//! only state shared between requests is the suggestion cache.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod state;
#[cfg(test)]
mod tests;

use api::{
    handle_ai_suggest, handle_analyze, handle_generate_report, handle_health, handle_root,
    handle_suggest,
};
use llm_client::LlmConfig;
use state::AppState;

/// Command-line arguments for the suggestion server
#[derive(Parser, Debug)]
#[command(name = "a11y-server")]
#[command(about = "AI-powered accessibility suggestion service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Report render timeout in milliseconds
    #[arg(long, default_value = "15000")]
    render_timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting a11y-server on {}:{}", args.host, args.port);

    // Credentials are read once here and passed down; business logic never
    // touches the environment.
    let state = Arc::new(AppState::new(LlmConfig::from_env(), args.render_timeout_ms)?);
    info!("AI suggestions configured: {}", state.ai_configured());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_root))
        .route("/api/health", get(handle_health))
        .route("/api/suggest", post(handle_suggest))
        .route("/api/ai_suggest", post(handle_ai_suggest))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/generate_report", post(handle_generate_report))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Report render timeout: {}ms", args.render_timeout_ms);

    axum::serve(listener, app).await?;

    Ok(())
}
