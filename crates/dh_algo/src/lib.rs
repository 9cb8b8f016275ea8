// crates/dh_algo/src/lib.rs
#![forbid(unsafe_code)]

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod dhondt;

    pub use dhondt::{allocate_dhondt, quotient_table, AllocError, QuotientCell, QuotientRow, QuotientTable};
}

// ----------------------------- Coalitions --------------------------------------------

pub mod coalition;

pub use allocation::{allocate_dhondt, AllocError};
pub use coalition::{coalition, majority_threshold, CoalitionError, CoalitionOutcome};

/// Votes per party in submission order. Order matters: it is the tie-break
/// order for equal quotients and the order seat vectors are returned in.
pub type VoteTable = Vec<(String, u64)>;

/// Seats per party, same order as the `VoteTable` it was computed from.
pub type SeatVector = Vec<(String, u32)>;
