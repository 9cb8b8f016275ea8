//! dh_pipeline — simulation request processing
//! (validate → aggregate → threshold → allocate → build).
//!
//! This crate stays I/O-free and delegates math to `dh_algo`. Every call works
//! on its own input and returns fresh output, so `process` can be called from
//! any number of threads at once without coordination.

use dh_algo::allocation::{quotient_table, QuotientTable};
use dh_algo::AllocError;
use dh_core::{SimulationRequest, SimulationSnapshot, SimulationSummary};
use thiserror::Error;
use tracing::{debug, instrument};

pub mod aggregate;
pub mod allocate;
pub mod build_result;
pub mod validate;

pub use aggregate::{compute_totals, min_votes_threshold, Totals};
pub use validate::{validate, EntityRef, ValidRequest, ValidationIssue, MAX_QUOTIENT_CELLS, MAX_SEATS};

/// Single error surface for request processing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request broke a validation rule; nothing was computed.
    #[error("invalid input: {}", .0.message)]
    InvalidInput(ValidationIssue),

    /// A positive threshold removed every party.
    #[error(
        "no party reaches the {threshold_percent}% threshold ({min_votes} votes); lower the threshold or review the votes"
    )]
    ThresholdExclusion { threshold_percent: f64, min_votes: u64 },

    /// Allocator refused its input. Validation rules out every case, so this
    /// signals a bug rather than bad input.
    #[error("allocation failed: {0}")]
    Allocate(#[from] AllocError),
}

impl From<ValidationIssue> for PipelineError {
    fn from(issue: ValidationIssue) -> Self {
        PipelineError::InvalidInput(issue)
    }
}

impl PipelineError {
    /// Stable code for callers that map errors to responses.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(issue) => issue.code,
            PipelineError::ThresholdExclusion { .. } => "Threshold.NoPartyQualifies",
            PipelineError::Allocate(_) => "Allocate.Internal",
        }
    }
}

/// Run a simulation request end to end.
///
/// Returns the summary for display and a snapshot ready to persist (name
/// unset). Fails fast on the first validation issue, or when a positive
/// threshold leaves no party standing; no partial result is produced.
#[instrument(level = "debug", skip_all, fields(seats = request.seats, parties = request.parties.len()))]
pub fn process(request: &SimulationRequest) -> Result<(SimulationSummary, SimulationSnapshot), PipelineError> {
    let valid = validate(request)?;
    let totals = compute_totals(&valid)?;
    debug!(
        valid_votes = totals.valid_votes,
        total_cast = totals.total_cast,
        min_votes = totals.min_votes_threshold,
        "totals computed"
    );

    let seats = allocate::allocate_seats(&valid, &totals)?;

    let results = build_result::build_results(request, &valid, &totals, &seats);
    let summary = build_result::build_summary(&valid, &totals, results);
    let snapshot = build_result::build_snapshot(request, &summary);
    Ok((summary, snapshot))
}

/// Divisor table behind the allocation of `request`, restricted to the
/// parties that clear the threshold. Same validation and errors as `process`,
/// plus `Quotients.TooMany` when the table would exceed `MAX_QUOTIENT_CELLS`.
pub fn quotient_breakdown(request: &SimulationRequest) -> Result<QuotientTable, PipelineError> {
    let valid = validate(request)?;
    let totals = compute_totals(&valid)?;
    let eligible = allocate::eligible_parties(&valid, &totals)?;
    let cells = eligible.len().saturating_mul(valid.seats as usize);
    if cells > MAX_QUOTIENT_CELLS {
        return Err(validate::quotient_table_issue(cells).into());
    }
    Ok(quotient_table(&eligible, valid.seats)?)
}
