//! ALLOCATE stage: threshold filter, then D’Hondt over the survivors.
//!
//! Input: the validated request and its totals.
//! Output: seats per surviving party, in submission order. Parties removed by
//! the threshold are absent from the vector; the result builder treats a
//! missing party as 0 seats.

use dh_algo::{allocate_dhondt, SeatVector, VoteTable};
use tracing::debug;

use crate::aggregate::Totals;
use crate::validate::ValidRequest;
use crate::PipelineError;

/// Parties eligible for seats. With no threshold every party is eligible,
/// zero-vote parties included.
pub fn eligible_parties(req: &ValidRequest, totals: &Totals) -> Result<VoteTable, PipelineError> {
    if !req.threshold_applies() {
        return Ok(req.party_votes.clone());
    }

    let kept: VoteTable = req
        .party_votes
        .iter()
        .filter(|(_, v)| *v >= totals.min_votes_threshold)
        .cloned()
        .collect();

    if kept.is_empty() {
        return Err(PipelineError::ThresholdExclusion {
            threshold_percent: req.threshold_percent,
            min_votes: totals.min_votes_threshold,
        });
    }
    debug!(
        kept = kept.len(),
        dropped = req.party_votes.len() - kept.len(),
        min_votes = totals.min_votes_threshold,
        "threshold applied"
    );
    Ok(kept)
}

/// Run the allocator over the eligible parties.
pub fn allocate_seats(req: &ValidRequest, totals: &Totals) -> Result<SeatVector, PipelineError> {
    let eligible = eligible_parties(req, totals)?;
    let seats = allocate_dhondt(&eligible, req.seats)?;
    debug!(seats = req.seats, parties = eligible.len(), "d'hondt allocation done");
    Ok(seats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::compute_totals;

    fn req(parties: &[(&str, u64)], blank: u64, pct: f64, seats: u32) -> ValidRequest {
        ValidRequest {
            seats,
            blank_votes: blank,
            null_votes: 0,
            threshold_percent: pct,
            party_votes: parties.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
            party_total: parties.iter().map(|(_, v)| v).sum(),
        }
    }

    #[test]
    fn threshold_drops_small_party() {
        let r = req(&[("A", 70), ("B", 25), ("C", 5)], 0, 10.0, 10);
        let t = compute_totals(&r).unwrap();
        let kept = eligible_parties(&r, &t).unwrap();
        assert_eq!(kept, vec![("A".to_string(), 70), ("B".to_string(), 25)]);
    }

    #[test]
    fn party_exactly_at_threshold_is_kept() {
        let r = req(&[("A", 90), ("B", 10)], 0, 10.0, 3);
        let t = compute_totals(&r).unwrap();
        assert_eq!(eligible_parties(&r, &t).unwrap().len(), 2);
    }

    #[test]
    fn everyone_excluded_is_an_error() {
        // Blank votes dominate: 10% of 1010 = 101 > any party.
        let r = req(&[("A", 6), ("B", 4)], 1000, 10.0, 3);
        let t = compute_totals(&r).unwrap();
        match allocate_seats(&r, &t) {
            Err(PipelineError::ThresholdExclusion { min_votes, .. }) => assert_eq!(min_votes, 101),
            other => panic!("expected threshold exclusion, got {other:?}"),
        }
    }

    #[test]
    fn no_threshold_keeps_zero_vote_parties() {
        let r = req(&[("A", 10), ("Z", 0)], 0, 0.0, 2);
        let t = compute_totals(&r).unwrap();
        let seats = allocate_seats(&r, &t).unwrap();
        assert_eq!(seats, vec![("A".to_string(), 2), ("Z".to_string(), 0)]);
    }
}
