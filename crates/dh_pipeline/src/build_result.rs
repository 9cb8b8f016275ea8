//! build_result.rs
//! Assemble the summary returned to the caller and the snapshot handed to
//! persistence. Every submitted party gets a row, in submission order.

use dh_core::{PartyResult, SimulationRequest, SimulationSnapshot, SimulationSummary};

use crate::aggregate::Totals;
use crate::validate::ValidRequest;

/// Build the per-party rows. `seats` may omit parties (filtered out by the
/// threshold); those rows carry 0 seats.
pub fn build_results(
    request: &SimulationRequest,
    valid: &ValidRequest,
    totals: &Totals,
    seats: &[(String, u32)],
) -> Vec<PartyResult> {
    request
        .parties
        .iter()
        .zip(valid.party_votes.iter())
        .map(|(party, (name, votes))| {
            let won = seats.iter().find(|(n, _)| n == name).map(|(_, s)| *s).unwrap_or(0);
            let passes_threshold = if valid.threshold_applies() {
                *votes >= totals.min_votes_threshold
            } else {
                true
            };
            PartyResult {
                name: party.name.clone(),
                votes: *votes,
                seats: won,
                color: party.color.clone(),
                passes_threshold,
            }
        })
        .collect()
}

pub fn build_summary(valid: &ValidRequest, totals: &Totals, results: Vec<PartyResult>) -> SimulationSummary {
    SimulationSummary {
        seats: valid.seats,
        blank_votes: valid.blank_votes,
        null_votes: valid.null_votes,
        valid_votes: totals.valid_votes,
        total_cast: totals.total_cast,
        threshold_percent: valid.threshold_percent,
        min_votes_threshold: totals.min_votes_threshold,
        results,
    }
}

/// Snapshot for persistence. The name stays unset; the CRUD layer fills it.
pub fn build_snapshot(request: &SimulationRequest, summary: &SimulationSummary) -> SimulationSnapshot {
    SimulationSnapshot::from_summary(summary, &request.parties)
}
