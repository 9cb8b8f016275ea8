//! D’Hondt (highest averages) allocation.
//!
//! Contract:
//! - For every party the quotients are v/1, v/2, …, v/seats.
//! - Of all (quotient, party) pairs, the `seats` largest each win one seat.
//! - Pure integers; no division in comparisons (cross-multiply in u128), which
//!   orders exactly like real-number division.
//!
//! Selection:
//! - Only each party's next unawarded quotient is live, held in a max-heap, so
//!   memory is O(parties + seats) rather than O(parties * seats).
//! - Equal quotients go to the earlier party in input order. This is the order
//!   a stable sort of all pairs (party by party, divisors ascending) yields,
//!   since a party's own quotients never increase with the divisor.
//! - Zero-vote parties are not special-cased; their zero quotients simply rank
//!   last and only win seats when nothing positive is left.

use core::cmp::Ordering;
use core::fmt;
use std::collections::{BTreeSet, BinaryHeap};

use crate::SeatVector;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The vote table is empty.
    NoParties,
    /// `seats == 0`; callers must ask for at least one seat.
    NoSeats,
    /// The same party name appears twice in the vote table.
    DuplicateParty(String),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::NoParties => write!(f, "no parties to allocate seats to"),
            AllocError::NoSeats => write!(f, "seat count must be at least 1"),
            AllocError::DuplicateParty(n) => write!(f, "party listed twice: {n}"),
        }
    }
}

impl std::error::Error for AllocError {}

/// One live quotient: `votes / divisor` for the party at `party`.
#[derive(Clone, Copy, Debug)]
struct Quotient {
    party: usize,
    votes: u64,
    divisor: u32,
}

/// Heap order: larger quotient first, then the earlier party.
impl Ord for Quotient {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_quotients(self, other).then_with(|| other.party.cmp(&self.party))
    }
}

impl PartialOrd for Quotient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Quotient {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Quotient {}

/// Allocate `seats` using the D’Hondt method.
///
/// Returns one entry per input party, in input order; parties that win nothing
/// are present with 0.
pub fn allocate_dhondt(votes: &[(String, u64)], seats: u32) -> Result<SeatVector, AllocError> {
    let winners = seat_winners(votes, seats)?;

    let mut out: SeatVector = votes.iter().map(|(name, _)| (name.clone(), 0)).collect();
    for q in &winners {
        out[q.party].1 += 1;
    }
    Ok(out)
}

/// The `seats` winning quotients, in award order.
fn seat_winners(votes: &[(String, u64)], seats: u32) -> Result<Vec<Quotient>, AllocError> {
    if votes.is_empty() {
        return Err(AllocError::NoParties);
    }
    if seats == 0 {
        return Err(AllocError::NoSeats);
    }
    check_unique(votes)?;

    let mut live: BinaryHeap<Quotient> = votes
        .iter()
        .enumerate()
        .map(|(party, (_, v))| Quotient { party, votes: *v, divisor: 1 })
        .collect();

    let mut winners = Vec::with_capacity(seats as usize);
    while winners.len() < seats as usize {
        // Never empty: a party stays live until its divisor reaches `seats`.
        let Some(q) = live.pop() else { break };
        winners.push(q);
        if q.divisor < seats {
            live.push(Quotient { divisor: q.divisor + 1, ..q });
        }
    }
    Ok(winners)
}

fn check_unique(votes: &[(String, u64)]) -> Result<(), AllocError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for (name, _) in votes {
        if !seen.insert(name.as_str()) {
            return Err(AllocError::DuplicateParty(name.clone()));
        }
    }
    Ok(())
}

/// Compare quotients v_a/d_a vs v_b/d_b without floats.
/// Returns Ordering::Greater if a's quotient is larger.
fn cmp_quotients(a: &Quotient, b: &Quotient) -> Ordering {
    // Compare v_a * d_b ? v_b * d_a in u128 to avoid overflow.
    let lhs = (a.votes as u128) * (b.divisor as u128);
    let rhs = (b.votes as u128) * (a.divisor as u128);
    lhs.cmp(&rhs)
}

// ----------------------------- Quotient table ----------------------------------------

/// One cell of the divisor table.
#[derive(Clone, Debug, PartialEq)]
pub struct QuotientCell {
    pub divisor: u32,
    /// `votes / divisor`, for display only; ranking never uses this value.
    pub value: f64,
    /// 1-based position in the global ranking when this quotient won a seat.
    pub seat_rank: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuotientRow {
    pub party: String,
    pub votes: u64,
    pub cells: Vec<QuotientCell>,
}

impl QuotientRow {
    pub fn seats(&self) -> u32 {
        self.cells.iter().filter(|c| c.seat_rank.is_some()).count() as u32
    }
}

/// Full divisor table plus the quotient that won the last seat.
#[derive(Clone, Debug, PartialEq)]
pub struct QuotientTable {
    pub seats: u32,
    pub rows: Vec<QuotientRow>,
    /// (party, divisor, value) of the quotient ranked `seats`-th.
    pub last_seat: Option<(String, u32, f64)>,
}

/// Build the divisor table behind an allocation. Seat counts derived from the
/// table always match `allocate_dhondt` for the same input.
///
/// Unlike the allocation itself the table holds `parties * seats` cells;
/// callers bound that product before asking for one.
pub fn quotient_table(votes: &[(String, u64)], seats: u32) -> Result<QuotientTable, AllocError> {
    let winners = seat_winners(votes, seats)?;

    let mut rows: Vec<QuotientRow> = votes
        .iter()
        .map(|(name, v)| QuotientRow {
            party: name.clone(),
            votes: *v,
            cells: (1..=seats)
                .map(|d| QuotientCell { divisor: d, value: *v as f64 / d as f64, seat_rank: None })
                .collect(),
        })
        .collect();

    let mut last_seat = None;
    for (rank, q) in winners.iter().enumerate() {
        let row = &mut rows[q.party];
        row.cells[(q.divisor - 1) as usize].seat_rank = Some(rank as u32 + 1);
        last_seat = Some((row.party.clone(), q.divisor, q.votes as f64 / q.divisor as f64));
    }

    Ok(QuotientTable { seats, rows, last_seat })
}
