//! crates/dh_pipeline/src/validate.rs
//! Structural & semantic validation before any computation.
//!
//! Checks run in a fixed order and the first failure is reported:
//!   1. seat count (1..=MAX_SEATS)
//!   2. blank / null votes non-negative
//!   3. threshold in [0, 100]
//!   4. at least one party
//!   5. per party, in submission order: name not blank, votes non-negative,
//!      name (trimmed) not already used
//!   6. party votes sum to something positive

use std::collections::BTreeSet;

use dh_core::SimulationRequest;

/// Largest seat count accepted.
pub const MAX_SEATS: i64 = 10_000;

/// Largest divisor table (`eligible parties * seats`) `quotient_breakdown`
/// will build. Allocation alone never materialises the table.
pub const MAX_QUOTIENT_CELLS: usize = 1_000_000;

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Root,
    Field(&'static str),
    /// Zero-based position in `parties`.
    Party(usize),
}

/// One validation finding. `code` is stable; `message` is for humans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

impl ValidationIssue {
    fn new(code: &'static str, where_: EntityRef, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), where_ }
    }
}

/// A request that passed every check, with counts in their unsigned form.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidRequest {
    pub seats: u32,
    pub blank_votes: u64,
    pub null_votes: u64,
    pub threshold_percent: f64,
    /// (name as submitted, votes), submission order.
    pub party_votes: Vec<(String, u64)>,
    pub party_total: u64,
}

impl ValidRequest {
    #[inline]
    pub fn threshold_applies(&self) -> bool {
        self.threshold_percent > 0.0
    }
}

/// Top-level entry point.
pub fn validate(req: &SimulationRequest) -> Result<ValidRequest, ValidationIssue> {
    // 1
    if req.seats < 1 {
        return Err(ValidationIssue::new(
            "Seats.BelowOne",
            EntityRef::Field("seats"),
            "the number of seats must be at least 1",
        ));
    }
    if req.seats > MAX_SEATS {
        return Err(ValidationIssue::new(
            "Seats.TooMany",
            EntityRef::Field("seats"),
            format!("the number of seats must not exceed {MAX_SEATS}"),
        ));
    }

    // 2
    if req.blank_votes < 0 || req.null_votes < 0 {
        let field = if req.blank_votes < 0 { "blank_votes" } else { "null_votes" };
        return Err(ValidationIssue::new(
            "Votes.Negative",
            EntityRef::Field(field),
            "blank and null votes cannot be negative",
        ));
    }

    // 3 (NaN fails the range check too)
    if !(0.0..=100.0).contains(&req.threshold_percent) {
        return Err(ValidationIssue::new(
            "Threshold.OutOfRange",
            EntityRef::Field("threshold_percent"),
            "the threshold must be between 0 and 100",
        ));
    }

    // 4
    if req.parties.is_empty() {
        return Err(ValidationIssue::new(
            "Parties.Empty",
            EntityRef::Field("parties"),
            "at least one party is required",
        ));
    }

    // 5
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut party_votes = Vec::with_capacity(req.parties.len());
    for (i, p) in req.parties.iter().enumerate() {
        let trimmed = p.name.trim();
        if trimmed.is_empty() {
            return Err(ValidationIssue::new(
                "Party.NameBlank",
                EntityRef::Party(i),
                "every party must have a name",
            ));
        }
        if p.votes < 0 {
            return Err(ValidationIssue::new(
                "Party.VotesNegative",
                EntityRef::Party(i),
                format!("votes of party '{trimmed}' cannot be negative"),
            ));
        }
        if !seen.insert(trimmed) {
            return Err(ValidationIssue::new(
                "Party.NameDuplicate",
                EntityRef::Party(i),
                format!("party '{trimmed}' is listed more than once"),
            ));
        }
        party_votes.push((p.name.clone(), p.votes as u64));
    }

    // 6
    let party_total = party_votes
        .iter()
        .try_fold(0u64, |acc, (_, v)| acc.checked_add(*v))
        .ok_or_else(overflow_issue)?;
    if party_total == 0 {
        return Err(ValidationIssue::new(
            "Votes.ZeroTotal",
            EntityRef::Field("parties"),
            "there must be at least one party vote to allocate seats",
        ));
    }

    Ok(ValidRequest {
        seats: req.seats as u32,
        blank_votes: req.blank_votes as u64,
        null_votes: req.null_votes as u64,
        threshold_percent: req.threshold_percent,
        party_votes,
        party_total,
    })
}

pub(crate) fn quotient_table_issue(cells: usize) -> ValidationIssue {
    ValidationIssue::new(
        "Quotients.TooMany",
        EntityRef::Root,
        format!("a divisor table of {cells} quotients exceeds the limit of {MAX_QUOTIENT_CELLS}"),
    )
}

pub(crate) fn overflow_issue() -> ValidationIssue {
    ValidationIssue::new("Votes.Overflow", EntityRef::Root, "vote totals overflow a 64-bit counter")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dh_core::Party;

    fn base() -> SimulationRequest {
        SimulationRequest::new(5, vec![Party::new("A", 10), Party::new("B", 5)])
    }

    fn code(req: &SimulationRequest) -> &'static str {
        validate(req).unwrap_err().code
    }

    #[test]
    fn accepts_well_formed_request() {
        let v = validate(&base()).unwrap();
        assert_eq!(v.seats, 5);
        assert_eq!(v.party_total, 15);
        assert!(!v.threshold_applies());
    }

    #[test]
    fn seat_bounds() {
        let mut r = base();
        r.seats = 0;
        assert_eq!(code(&r), "Seats.BelowOne");
        r.seats = -3;
        assert_eq!(code(&r), "Seats.BelowOne");
        r.seats = MAX_SEATS + 1;
        assert_eq!(code(&r), "Seats.TooMany");
    }

    #[test]
    fn negative_blank_or_null() {
        let mut r = base();
        r.null_votes = -1;
        let issue = validate(&r).unwrap_err();
        assert_eq!(issue.code, "Votes.Negative");
        assert_eq!(issue.where_, EntityRef::Field("null_votes"));
    }

    #[test]
    fn threshold_range_and_nan() {
        let mut r = base();
        r.threshold_percent = 100.5;
        assert_eq!(code(&r), "Threshold.OutOfRange");
        r.threshold_percent = -0.1;
        assert_eq!(code(&r), "Threshold.OutOfRange");
        r.threshold_percent = f64::NAN;
        assert_eq!(code(&r), "Threshold.OutOfRange");
        r.threshold_percent = 100.0;
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn party_checks_report_position() {
        let mut r = base();
        r.parties.push(Party::new("   ", 1));
        assert_eq!(validate(&r).unwrap_err().where_, EntityRef::Party(2));

        let mut r = base();
        r.parties[1].votes = -1;
        assert_eq!(code(&r), "Party.VotesNegative");

        let mut r = base();
        r.parties.push(Party::new(" A ", 1));
        assert_eq!(code(&r), "Party.NameDuplicate");
    }

    #[test]
    fn first_failing_check_wins() {
        // Seats and parties are both wrong; seats is checked first.
        let r = SimulationRequest::new(0, vec![]);
        assert_eq!(code(&r), "Seats.BelowOne");
        // Empty party list is reported before zero totals.
        let r = SimulationRequest::new(1, vec![]);
        assert_eq!(code(&r), "Parties.Empty");
    }

    #[test]
    fn zero_party_votes_rejected_even_with_blank_and_null() {
        let mut r = SimulationRequest::new(3, vec![Party::new("A", 0)]);
        r.blank_votes = 100;
        r.null_votes = 7;
        assert_eq!(code(&r), "Votes.ZeroTotal");
    }

    #[test]
    fn party_sum_overflow_is_reported() {
        let r = SimulationRequest::new(1, vec![Party::new("A", i64::MAX), Party::new("B", i64::MAX), Party::new("C", 2)]);
        assert_eq!(code(&r), "Votes.Overflow");
    }
}
