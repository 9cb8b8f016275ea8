//! render_json.rs — report JSON.
//!
//! Output is compact with object keys in sorted order (serde_json's default
//! map is ordered), which matches the canonical JSON written by dh_io.

use crate::{ReportError, ReportModel};

pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    let value = serde_json::to_value(model).map_err(|e| ReportError::Serialize(e.to_string()))?;
    serde_json::to_string(&value).map_err(|e| ReportError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::*;

    fn tiny() -> ReportModel {
        ReportModel {
            title: "t".into(),
            totals: TotalsBlock { seats: 1, valid_votes: 10, blank_votes: 0, null_votes: 0, total_cast: 10 },
            threshold: ThresholdBlock { applied: false, percent: "0%".into(), min_votes: 0 },
            majority: 1,
            rows: vec![ReportRow {
                name: "A".into(),
                color: None,
                votes: 10,
                vote_share: "100.0%".into(),
                seats: 1,
                seat_share: "100.0%".into(),
                below_threshold: false,
            }],
            outcome: OutcomeBlock { largest_party: Some("A".into()), majority_party: Some("A".into()) },
        }
    }

    #[test]
    fn keys_are_sorted_and_compact() {
        let s = render_json(&tiny()).unwrap();
        assert!(s.starts_with(r#"{"majority":1,"outcome":{"largest_party":"A","majority_party":"A"},"rows":"#));
        assert!(!s.contains(": ") && !s.contains(", "));
        assert!(!s.ends_with('\n'));
    }
}
