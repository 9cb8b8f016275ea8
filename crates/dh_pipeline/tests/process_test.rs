//! End-to-end behaviour of `process`.

use dh_core::{Party, SimulationRequest, SimulationSnapshot};
use dh_pipeline::{process, quotient_breakdown, PipelineError};
use proptest::prelude::*;

fn request(seats: i64, parties: &[(&str, i64)]) -> SimulationRequest {
    SimulationRequest::new(seats, parties.iter().map(|(n, v)| Party::new(*n, *v)).collect())
}

#[test]
fn textbook_example() {
    let (summary, _) = process(&request(4, &[("A", 100), ("B", 80), ("C", 30)])).unwrap();
    let seats: Vec<u32> = summary.results.iter().map(|r| r.seats).collect();
    assert_eq!(seats, vec![2, 2, 0]);
    assert!(summary.results.iter().all(|r| r.passes_threshold));
    assert_eq!(summary.valid_votes, 210);
    assert_eq!(summary.total_cast, 210);
    assert_eq!(summary.min_votes_threshold, 0);
}

#[test]
fn threshold_excludes_small_party() {
    let mut req = request(10, &[("A", 70), ("B", 25), ("C", 5)]);
    req.threshold_percent = 10.0;

    let (summary, snapshot) = process(&req).unwrap();
    assert_eq!(summary.valid_votes, 100);
    assert_eq!(summary.min_votes_threshold, 10);

    let c = summary.result_for("C").unwrap();
    assert!(!c.passes_threshold);
    assert_eq!(c.seats, 0);
    assert!(summary.result_for("A").unwrap().passes_threshold);
    assert!(summary.result_for("B").unwrap().passes_threshold);
    assert_eq!(summary.allocated_seats(), 10);

    // Results keep submission order, filtered parties included.
    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    let SimulationSnapshot::V1(v1) = snapshot;
    assert_eq!(v1.name, None);
    assert_eq!(v1.parties, req.parties);
    assert_eq!(v1.results, summary.results);
    assert_eq!(v1.min_votes_threshold, 10);
}

#[test]
fn threshold_excluding_everyone_fails() {
    let mut req = request(5, &[("A", 3), ("B", 2)]);
    req.blank_votes = 95;
    req.threshold_percent = 10.0;
    let err = process(&req).unwrap_err();
    assert!(matches!(err, PipelineError::ThresholdExclusion { min_votes: 10, .. }), "{err}");
    assert_eq!(err.code(), "Threshold.NoPartyQualifies");
}

#[test]
fn zero_party_votes_is_invalid_input() {
    let mut req = request(3, &[("A", 0), ("B", 0)]);
    req.blank_votes = 10;
    req.null_votes = 4;
    match process(&req).unwrap_err() {
        PipelineError::InvalidInput(issue) => assert_eq!(issue.code, "Votes.ZeroTotal"),
        other => panic!("unexpected: {other}"),
    }
}

#[test]
fn blank_and_null_feed_totals() {
    let mut req = request(3, &[("A", 60), ("B", 30)]);
    req.blank_votes = 10;
    req.null_votes = 5;
    req.threshold_percent = 5.0;
    let (summary, _) = process(&req).unwrap();
    assert_eq!(summary.blank_votes, 10);
    assert_eq!(summary.null_votes, 5);
    assert_eq!(summary.valid_votes, 100);
    assert_eq!(summary.total_cast, 105);
    assert_eq!(summary.min_votes_threshold, 5);
}

#[test]
fn colors_are_carried_through() {
    let req = SimulationRequest::new(2, vec![Party::new("A", 10).with_color("#e30613"), Party::new("B", 9)]);
    let (summary, _) = process(&req).unwrap();
    assert_eq!(summary.results[0].color.as_deref(), Some("#e30613"));
    assert_eq!(summary.results[1].color, None);
}

#[test]
fn zero_vote_party_without_threshold_gets_a_row() {
    let (summary, _) = process(&request(2, &[("A", 10), ("Z", 0)])).unwrap();
    let z = summary.result_for("Z").unwrap();
    assert_eq!(z.seats, 0);
    assert!(z.passes_threshold);
}

#[test]
fn process_is_idempotent() {
    let mut req = request(7, &[("A", 340), ("B", 280), ("C", 160), ("D", 60)]);
    req.threshold_percent = 3.0;
    req.blank_votes = 12;
    let first = process(&req).unwrap();
    let second = process(&req).unwrap();
    assert_eq!(first, second);
}

#[test]
fn quotient_breakdown_covers_only_eligible_parties() {
    let mut req = request(10, &[("A", 70), ("B", 25), ("C", 5)]);
    req.threshold_percent = 10.0;
    let table = quotient_breakdown(&req).unwrap();
    let names: Vec<&str> = table.rows.iter().map(|r| r.party.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(table.rows.iter().map(|r| r.seats()).sum::<u32>(), 10);
}

#[test]
fn wide_requests_allocate_but_refuse_a_divisor_table() {
    let parties: Vec<Party> = (0..200).map(|i| Party::new(format!("P{i}"), 10 + i)).collect();
    let req = SimulationRequest::new(dh_pipeline::MAX_SEATS, parties);

    let (summary, _) = process(&req).unwrap();
    assert_eq!(summary.results.iter().map(|r| r.seats).sum::<u32>(), 10_000);

    // 200 * 10_000 cells is over the table limit.
    let err = quotient_breakdown(&req).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert_eq!(err.code(), "Quotients.TooMany");
}

#[test]
fn summary_serializes_with_stable_field_names() {
    let (summary, _) = process(&request(1, &[("A", 1)])).unwrap();
    let v = serde_json::to_value(&summary).unwrap();
    for key in [
        "seats",
        "blank_votes",
        "null_votes",
        "valid_votes",
        "total_cast",
        "threshold_percent",
        "min_votes_threshold",
        "results",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert_eq!(v["results"][0]["passes_threshold"], true);
}

proptest! {
    #[test]
    fn valid_requests_allocate_every_seat(
        votes in prop::collection::vec(0i64..500_000, 1..7),
        seats in 1i64..120,
        blank in 0i64..50_000,
        pct in 0.0f64..15.0,
    ) {
        prop_assume!(votes.iter().any(|v| *v > 0));
        let parties = votes.iter().enumerate().map(|(i, v)| Party::new(format!("P{i}"), *v)).collect();
        let mut req = SimulationRequest::new(seats, parties);
        req.blank_votes = blank;
        req.threshold_percent = pct;

        match process(&req) {
            Ok((summary, _)) => {
                prop_assert_eq!(summary.allocated_seats(), seats as u64);
                for r in &summary.results {
                    if !r.passes_threshold {
                        prop_assert_eq!(r.seats, 0);
                    }
                }
            }
            Err(PipelineError::ThresholdExclusion { .. }) => {}
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }
}
