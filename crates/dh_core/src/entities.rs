//! crates/dh_core/src/entities.rs
//! Request and result shapes.
//!
//! Counts on the request side are signed so that a negative value coming off
//! the wire reaches validation and is reported with a proper reason. Once a
//! request has been validated, every count on the output side is unsigned.

use serde::{Deserialize, Serialize};

/// One contender as submitted by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub votes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Party {
    pub fn new(name: impl Into<String>, votes: i64) -> Self {
        Self { name: name.into(), votes, color: None }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A full simulation request. `parties` order is significant: it is the
/// order results are reported in and the tie-break order for equal quotients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub seats: i64,
    #[serde(default)]
    pub blank_votes: i64,
    #[serde(default)]
    pub null_votes: i64,
    #[serde(default)]
    pub threshold_percent: f64,
    pub parties: Vec<Party>,
}

impl SimulationRequest {
    pub fn new(seats: i64, parties: Vec<Party>) -> Self {
        Self { seats, blank_votes: 0, null_votes: 0, threshold_percent: 0.0, parties }
    }
}

/// Outcome for one party, reported for every submitted party.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyResult {
    pub name: String,
    pub votes: u64,
    pub seats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub passes_threshold: bool,
}

/// What a calculation returns to its caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub seats: u32,
    pub blank_votes: u64,
    pub null_votes: u64,
    /// Party votes + blank votes.
    pub valid_votes: u64,
    /// Valid votes + null votes.
    pub total_cast: u64,
    pub threshold_percent: f64,
    pub min_votes_threshold: u64,
    pub results: Vec<PartyResult>,
}

impl SimulationSummary {
    pub fn allocated_seats(&self) -> u64 {
        self.results.iter().map(|r| r.seats as u64).sum()
    }

    pub fn result_for(&self, name: &str) -> Option<&PartyResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_optional_fields_default_to_zero() {
        let req: SimulationRequest = serde_json::from_str(
            r#"{"seats":3,"parties":[{"name":"A","votes":10}]}"#,
        )
        .unwrap();
        assert_eq!(req.blank_votes, 0);
        assert_eq!(req.null_votes, 0);
        assert_eq!(req.threshold_percent, 0.0);
        assert_eq!(req.parties[0].color, None);
    }

    #[test]
    fn negative_votes_survive_decoding() {
        let req: SimulationRequest = serde_json::from_str(
            r#"{"seats":3,"blank_votes":-1,"parties":[{"name":"A","votes":-5}]}"#,
        )
        .unwrap();
        assert_eq!(req.blank_votes, -1);
        assert_eq!(req.parties[0].votes, -5);
    }
}
