//! AGGREGATE stage: vote totals and the threshold expressed in votes.
//!
//! - valid votes = party votes + blank votes
//! - total cast  = valid votes + null votes
//! - threshold   = floor(valid * pct / 100) when pct > 0, else 0
//!
//! The threshold is computed in floating point, multiply first, then divide,
//! then truncate. Keep that order: saved simulations carry the resulting
//! `min_votes_threshold` and must stay reproducible.

use crate::validate::{overflow_issue, ValidRequest, ValidationIssue};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub party_votes: u64,
    pub valid_votes: u64,
    pub total_cast: u64,
    pub min_votes_threshold: u64,
}

pub fn compute_totals(req: &ValidRequest) -> Result<Totals, ValidationIssue> {
    let valid_votes = req.party_total.checked_add(req.blank_votes).ok_or_else(overflow_issue)?;
    let total_cast = valid_votes.checked_add(req.null_votes).ok_or_else(overflow_issue)?;

    Ok(Totals {
        party_votes: req.party_total,
        valid_votes,
        total_cast,
        min_votes_threshold: min_votes_threshold(valid_votes, req.threshold_percent),
    })
}

/// Minimum votes a party needs at `threshold_percent` of `valid_votes`.
pub fn min_votes_threshold(valid_votes: u64, threshold_percent: f64) -> u64 {
    if threshold_percent > 0.0 {
        // `as` saturates; pct <= 100 keeps the product within range anyway.
        ((valid_votes as f64) * threshold_percent / 100.0).floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(parties: &[u64], blank: u64, null: u64, pct: f64) -> ValidRequest {
        ValidRequest {
            seats: 1,
            blank_votes: blank,
            null_votes: null,
            threshold_percent: pct,
            party_votes: parties.iter().enumerate().map(|(i, v)| (format!("P{i}"), *v)).collect(),
            party_total: parties.iter().sum(),
        }
    }

    #[test]
    fn totals_include_blank_then_null() {
        let t = compute_totals(&req(&[70, 25, 5], 10, 4, 0.0)).unwrap();
        assert_eq!(t.party_votes, 100);
        assert_eq!(t.valid_votes, 110);
        assert_eq!(t.total_cast, 114);
        assert_eq!(t.min_votes_threshold, 0);
    }

    #[test]
    fn threshold_is_floored() {
        assert_eq!(min_votes_threshold(100, 10.0), 10);
        assert_eq!(min_votes_threshold(999, 5.0), 49); // 49.95
        assert_eq!(min_votes_threshold(1_234, 3.0), 37); // 37.02
        assert_eq!(min_votes_threshold(50, 0.0), 0);
        assert_eq!(min_votes_threshold(50, 100.0), 50);
    }

    #[test]
    fn blank_votes_raise_the_bar() {
        let t = compute_totals(&req(&[70, 25, 5], 100, 0, 10.0)).unwrap();
        assert_eq!(t.min_votes_threshold, 20);
    }

    #[test]
    fn overflow_in_totals_is_reported() {
        let issue = compute_totals(&req(&[u64::MAX - 1], 1, 1, 0.0)).unwrap_err();
        assert_eq!(issue.code, "Votes.Overflow");
    }
}
