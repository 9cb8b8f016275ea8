//! Property tests for the D'Hondt allocator.

use dh_algo::allocation::{allocate_dhondt, quotient_table};
use proptest::prelude::*;

fn table(votes: &[u64]) -> Vec<(String, u64)> {
    votes.iter().enumerate().map(|(i, v)| (format!("P{i}"), *v)).collect()
}

/// Every quotient generated party by party, divisors ascending, then a stable
/// sort by exact value; the first `seats` entries win.
fn full_sort_allocation(votes: &[u64], seats: u32) -> Vec<u32> {
    let mut all: Vec<(usize, u64, u32)> = Vec::new();
    for (p, v) in votes.iter().enumerate() {
        for d in 1..=seats {
            all.push((p, *v, d));
        }
    }
    all.sort_by(|a, b| (u128::from(b.1) * u128::from(a.2)).cmp(&(u128::from(a.1) * u128::from(b.2))));
    let mut out = vec![0u32; votes.len()];
    for (p, _, _) in all.iter().take(seats as usize) {
        out[*p] += 1;
    }
    out
}

proptest! {
    #[test]
    fn seats_always_sum_to_requested(
        votes in prop::collection::vec(0u64..1_000_000, 1..8),
        seats in 1u32..60,
    ) {
        let out = allocate_dhondt(&table(&votes), seats).unwrap();
        let total: u32 = out.iter().map(|(_, s)| *s).sum();
        prop_assert_eq!(total, seats);
        prop_assert_eq!(out.len(), votes.len());
    }

    #[test]
    fn more_votes_never_cost_seats(
        votes in prop::collection::vec(1u64..100_000, 2..6),
        seats in 1u32..40,
        pick in any::<prop::sample::Index>(),
        extra in 1u64..50_000,
    ) {
        let i = pick.index(votes.len());
        let before = allocate_dhondt(&table(&votes), seats).unwrap()[i].1;

        let mut bumped = votes.clone();
        bumped[i] += extra;
        let after = allocate_dhondt(&table(&bumped), seats).unwrap()[i].1;

        prop_assert!(after >= before, "party {} went from {} to {}", i, before, after);
    }

    #[test]
    fn zero_vote_parties_stay_empty_next_to_a_positive_one(
        votes in prop::collection::vec(0u64..1_000, 1..8),
        seats in 1u32..30,
    ) {
        let mut v = votes.clone();
        v.push(1); // guarantees at least `seats` positive quotients
        let out = allocate_dhondt(&table(&v), seats).unwrap();
        for (k, (_, s)) in out.iter().enumerate() {
            if v[k] == 0 {
                prop_assert_eq!(*s, 0);
            }
        }
    }

    #[test]
    fn quotient_table_agrees_with_allocation(
        votes in prop::collection::vec(0u64..10_000, 1..6),
        seats in 1u32..25,
    ) {
        let t = table(&votes);
        let out = allocate_dhondt(&t, seats).unwrap();
        let qt = quotient_table(&t, seats).unwrap();
        for (row, (_, s)) in qt.rows.iter().zip(out.iter()) {
            prop_assert_eq!(row.seats(), *s);
        }
    }

    #[test]
    fn matches_full_sort_including_ties(
        // Small vote range so equal quotients are common.
        votes in prop::collection::vec(0u64..12, 1..7),
        seats in 1u32..30,
    ) {
        let got: Vec<u32> = allocate_dhondt(&table(&votes), seats).unwrap().into_iter().map(|(_, s)| s).collect();
        prop_assert_eq!(got, full_sort_allocation(&votes, seats));
    }

    #[test]
    fn allocation_is_deterministic(
        votes in prop::collection::vec(0u64..10_000, 1..6),
        seats in 1u32..25,
    ) {
        let t = table(&votes);
        prop_assert_eq!(allocate_dhondt(&t, seats).unwrap(), allocate_dhondt(&t, seats).unwrap());
    }
}
