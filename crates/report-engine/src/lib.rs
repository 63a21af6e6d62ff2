//! Accessibility report rendering engine
//!
//! Turns a batch of issues (plus previously computed suggestions) into a
//! paginated PDF. The pipeline is split so the interesting part stays pure:
//!
//! - `layout` computes the document structure (grouping, page breaks,
//!   severity summary) deterministically from the report spec
//! - `compiler` feeds that structure into an embedded Typst template and
//!   compiles it in memory, with embedded fonts and a bounded timeout
//!
//! No intermediate entity persists; rendering is a one-shot transformation.

pub mod compiler;
pub mod fonts;
pub mod layout;
pub mod report;
mod world;

pub use compiler::{compile_pdf, RenderedReport, ReportError};
pub use layout::{build_layout, ReportLayout, ReportSpec};
pub use report::{render_report, report_filename};
