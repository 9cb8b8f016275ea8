//! Coalition arithmetic over an allocation: how many seats a set of parties
//! holds together and whether that reaches an absolute majority.

use core::fmt;
use std::collections::BTreeSet;

use dh_core::PartyResult;

/// Seats needed for an absolute majority of `seats`.
#[inline]
pub fn majority_threshold(seats: u32) -> u32 {
    seats / 2 + 1
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoalitionOutcome {
    /// Member names in allocation order, each once.
    pub members: Vec<String>,
    pub seats: u32,
    pub total_seats: u32,
    pub majority: u32,
    /// Share of `total_seats`, clamped to 0..=100.
    pub share_percent: f64,
    pub reaches_majority: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoalitionError {
    UnknownParty(String),
    NoSeats,
}

impl fmt::Display for CoalitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoalitionError::UnknownParty(n) => write!(f, "party not in the allocation: {n}"),
            CoalitionError::NoSeats => write!(f, "allocation has no seats"),
        }
    }
}

impl std::error::Error for CoalitionError {}

/// Sum the seats of `members` within `results`. Names listed twice count once.
pub fn coalition(
    results: &[PartyResult],
    total_seats: u32,
    members: &[&str],
) -> Result<CoalitionOutcome, CoalitionError> {
    if total_seats == 0 {
        return Err(CoalitionError::NoSeats);
    }

    let wanted: BTreeSet<&str> = members.iter().map(|m| m.trim()).collect();
    for name in &wanted {
        if !results.iter().any(|r| r.name == *name) {
            return Err(CoalitionError::UnknownParty((*name).to_string()));
        }
    }

    let mut names = Vec::new();
    let mut seats: u32 = 0;
    for r in results.iter().filter(|r| wanted.contains(r.name.as_str())) {
        names.push(r.name.clone());
        seats = seats.saturating_add(r.seats);
    }

    let majority = majority_threshold(total_seats);
    let share_percent = (seats as f64 * 100.0 / total_seats as f64).clamp(0.0, 100.0);

    Ok(CoalitionOutcome {
        members: names,
        seats,
        total_seats,
        majority,
        share_percent,
        reaches_majority: seats >= majority,
    })
}
