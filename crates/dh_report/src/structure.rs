//! Report model: everything a renderer prints, already formatted.
//!
//! Renderers never recompute. Percent strings are built from integer
//! ratios (one decimal, half-up) so the same summary always prints the
//! same digits on every platform.

use dh_algo::coalition::majority_threshold;
use dh_core::SimulationSummary;

use crate::ReportError;

/// Title used when the caller does not name the report.
pub const DEFAULT_TITLE: &str = "D'Hondt seat allocation";

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    pub title: String,
    pub totals: TotalsBlock,
    pub threshold: ThresholdBlock,
    /// Seats needed for an absolute majority.
    pub majority: u32,
    pub rows: Vec<ReportRow>,
    pub outcome: OutcomeBlock,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TotalsBlock {
    pub seats: u32,
    pub valid_votes: u64,
    pub blank_votes: u64,
    pub null_votes: u64,
    pub total_cast: u64,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThresholdBlock {
    pub applied: bool,
    pub percent: String,
    pub min_votes: u64,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub color: Option<String>,
    pub votes: u64,
    /// Share of valid votes, e.g. "47.6%".
    pub vote_share: String,
    pub seats: u32,
    pub seat_share: String,
    pub below_threshold: bool,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeBlock {
    /// Party with most seats; ties go to the earlier row. `None` if no seats.
    pub largest_party: Option<String>,
    /// Party holding an absolute majority on its own, if any.
    pub majority_party: Option<String>,
}

/// Build the model from a processed summary.
pub fn build_model(summary: &SimulationSummary, title: Option<&str>) -> Result<ReportModel, ReportError> {
    if summary.valid_votes == 0 {
        return Err(ReportError::Inconsistent("valid_votes is zero"));
    }
    if summary.allocated_seats() != u64::from(summary.seats) {
        return Err(ReportError::Inconsistent("allocated seats differ from seat count"));
    }

    let majority = majority_threshold(summary.seats);
    let threshold_applied = summary.threshold_percent > 0.0;

    let rows: Vec<ReportRow> = summary
        .results
        .iter()
        .map(|r| ReportRow {
            name: r.name.clone(),
            color: r.color.clone(),
            votes: r.votes,
            vote_share: percent_one_decimal(u128::from(r.votes), u128::from(summary.valid_votes)),
            seats: r.seats,
            seat_share: percent_one_decimal(u128::from(r.seats), u128::from(summary.seats)),
            below_threshold: !r.passes_threshold,
        })
        .collect();

    let mut largest: Option<&ReportRow> = None;
    for row in rows.iter().filter(|r| r.seats > 0) {
        if largest.map_or(true, |best| row.seats > best.seats) {
            largest = Some(row);
        }
    }
    let outcome = OutcomeBlock {
        largest_party: largest.map(|r| r.name.clone()),
        majority_party: rows.iter().find(|r| r.seats >= majority).map(|r| r.name.clone()),
    };

    Ok(ReportModel {
        title: title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TITLE).to_string(),
        totals: TotalsBlock {
            seats: summary.seats,
            valid_votes: summary.valid_votes,
            blank_votes: summary.blank_votes,
            null_votes: summary.null_votes,
            total_cast: summary.total_cast,
        },
        threshold: ThresholdBlock {
            applied: threshold_applied,
            percent: format!("{}%", summary.threshold_percent),
            min_votes: summary.min_votes_threshold,
        },
        majority,
        rows,
        outcome,
    })
}

/// `num/den` as a one-decimal percent string, rounded half-up, no floats.
pub fn percent_one_decimal(num: u128, den: u128) -> String {
    if den == 0 {
        return "0.0%".to_string();
    }
    let tenths = (num * 1000 + den / 2) / den;
    format!("{}.{}%", tenths / 10, tenths % 10)
}
