//! Typst compilation with timeout and error mapping
//!
//! Compilation is CPU-bound and runs on the blocking pool under a
//! `tokio::time::timeout`; diagnostics are flattened into a single error
//! message since report callers cannot act on span information.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use typst::diag::SourceDiagnostic;

use crate::world::{convert_inputs, ReportWorld};

/// Failures while producing a report PDF.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid report input: {0}")]
    InvalidInput(String),

    #[error("report compilation failed: {0}")]
    Compile(String),

    #[error("report compilation timed out after {0}ms")]
    Timeout(u64),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("render task panicked: {0}")]
    Join(String),
}

/// A finished PDF.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Compile Typst source with the given `sys.inputs` data into a PDF.
pub async fn compile_pdf(
    source: String,
    inputs: HashMap<String, serde_json::Value>,
    generated_at: DateTime<Utc>,
    timeout_ms: u64,
) -> Result<RenderedReport, ReportError> {
    let dict = convert_inputs(inputs)?;
    let world = ReportWorld::new(source, dict, generated_at);

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || {
            let warned = typst::compile(&world);
            match warned.output {
                Ok(document) => {
                    let bytes = typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default())
                        .map_err(|e| ReportError::Export(format!("{:?}", e)))?;
                    Ok(RenderedReport {
                        bytes,
                        page_count: document.pages.len(),
                    })
                }
                Err(diagnostics) => Err(ReportError::Compile(join_messages(&diagnostics))),
            }
        }),
    )
    .await;

    match result {
        Ok(Ok(rendered)) => rendered,
        Ok(Err(join_error)) => Err(ReportError::Join(join_error.to_string())),
        Err(_elapsed) => Err(ReportError::Timeout(timeout_ms)),
    }
}

fn join_messages(diagnostics: &[SourceDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.message.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
