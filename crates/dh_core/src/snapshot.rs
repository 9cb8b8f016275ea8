//! crates/dh_core/src/snapshot.rs
//! Persisted shape of a saved simulation.
//!
//! The snapshot is a discriminated record: the `schema` tag names the layout
//! and decoding an unknown tag fails instead of silently reading a payload
//! whose fields drifted. New layouts get a new variant; old ones stay
//! readable.

use serde::{Deserialize, Serialize};

use crate::entities::{Party, PartyResult, SimulationSummary};

/// Wire tag of the first snapshot layout.
pub const SNAPSHOT_SCHEMA_V1: &str = "dhondt.simulation/1";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema")]
pub enum SimulationSnapshot {
    #[serde(rename = "dhondt.simulation/1")]
    V1(SnapshotV1),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotV1 {
    /// Filled in by the CRUD layer; `None` straight out of the processor.
    #[serde(default)]
    pub name: Option<String>,
    pub seats: u32,
    pub blank_votes: u64,
    pub null_votes: u64,
    pub valid_votes: u64,
    pub total_cast: u64,
    pub threshold_percent: f64,
    pub min_votes_threshold: u64,
    /// Parties exactly as submitted.
    pub parties: Vec<Party>,
    pub results: Vec<PartyResult>,
}

impl SimulationSnapshot {
    /// Build a V1 snapshot from a summary and the submitted parties.
    pub fn from_summary(summary: &SimulationSummary, parties: &[Party]) -> Self {
        SimulationSnapshot::V1(SnapshotV1 {
            name: None,
            seats: summary.seats,
            blank_votes: summary.blank_votes,
            null_votes: summary.null_votes,
            valid_votes: summary.valid_votes,
            total_cast: summary.total_cast,
            threshold_percent: summary.threshold_percent,
            min_votes_threshold: summary.min_votes_threshold,
            parties: parties.to_vec(),
            results: summary.results.clone(),
        })
    }

    pub fn schema(&self) -> &'static str {
        match self {
            SimulationSnapshot::V1(_) => SNAPSHOT_SCHEMA_V1,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SimulationSnapshot::V1(v) => v.name.as_deref(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            SimulationSnapshot::V1(v) => v.name = Some(name.into()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn parties(&self) -> &[Party] {
        match self {
            SimulationSnapshot::V1(v) => &v.parties,
        }
    }

    /// Recover the summary that was shown when the snapshot was taken.
    pub fn summary(&self) -> SimulationSummary {
        match self {
            SimulationSnapshot::V1(v) => SimulationSummary {
                seats: v.seats,
                blank_votes: v.blank_votes,
                null_votes: v.null_votes,
                valid_votes: v.valid_votes,
                total_cast: v.total_cast,
                threshold_percent: v.threshold_percent,
                min_votes_threshold: v.min_votes_threshold,
                results: v.results.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimulationSnapshot {
        let summary = SimulationSummary {
            seats: 2,
            blank_votes: 1,
            null_votes: 0,
            valid_votes: 11,
            total_cast: 11,
            threshold_percent: 0.0,
            min_votes_threshold: 0,
            results: vec![PartyResult {
                name: "A".into(),
                votes: 10,
                seats: 2,
                color: Some("#ff0000".into()),
                passes_threshold: true,
            }],
        };
        SimulationSnapshot::from_summary(&summary, &[Party::new("A", 10).with_color("#ff0000")])
    }

    #[test]
    fn schema_tag_is_written() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["schema"], SNAPSHOT_SCHEMA_V1);
        assert_eq!(v["name"], serde_json::Value::Null);
        assert_eq!(v["results"][0]["seats"], 2);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let mut v = serde_json::to_value(sample()).unwrap();
        v["schema"] = serde_json::json!("dhondt.simulation/99");
        assert!(serde_json::from_value::<SimulationSnapshot>(v).is_err());
    }

    #[test]
    fn summary_is_recoverable_and_name_settable() {
        let snap = sample().with_name("mine");
        assert_eq!(snap.name(), Some("mine"));
        let back: SimulationSnapshot =
            serde_json::from_str(&serde_json::to_string(&snap).unwrap()).unwrap();
        assert_eq!(back, snap);
        assert_eq!(back.summary().allocated_seats(), 2);
    }
}
