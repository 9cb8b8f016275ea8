//! dh_report — pure offline report model + renderers (JSON/HTML/text).
//!
//! Determinism rules:
//! - No I/O here. Callers hand over a `SimulationSummary` already computed.
//! - Percent strings use one-decimal formatting without float arithmetic.
//! - Stable row order (submission order) and field names.

#![deny(unsafe_code)]

use thiserror::Error;

pub mod structure;
pub mod render_text;

#[cfg(feature = "render_json")]
pub mod render_json;

#[cfg(feature = "render_html")]
pub mod render_html;

pub use structure::{build_model, percent_one_decimal, ReportModel, ReportRow, DEFAULT_TITLE};
pub use render_text::{render_quotients, render_text};

#[cfg(feature = "render_json")]
pub use render_json::render_json;

#[cfg(feature = "render_html")]
pub use render_html::render_html;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The summary contradicts itself (seat sum, empty denominator).
    #[error("inconsistent summary: {0}")]
    Inconsistent(&'static str),

    #[error("report serialization failed: {0}")]
    Serialize(String),
}
