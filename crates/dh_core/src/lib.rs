//! dh_core — Core types shared across the D'Hondt engine.
//!
//! This crate is **I/O-free**. It defines the stable shapes used by
//! `dh_algo`, `dh_pipeline`, `dh_io`, `dh_report` and `dh_cli`:
//!
//! - Wire types: `Party`, `SimulationRequest`
//! - Outputs: `PartyResult`, `SimulationSummary`
//! - Persisted shape: `SimulationSnapshot` (explicitly versioned)
//! - Ids and names: `AccountId`, `SnapshotId`, `SimulationName`

#![forbid(unsafe_code)]

pub mod entities;
pub mod ids;
pub mod snapshot;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId(String),
        BlankName,
        NameTooLong(usize),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId(s) => write!(f, "invalid id: {s}"),
                CoreError::BlankName => write!(f, "simulation name must not be blank"),
                CoreError::NameTooLong(n) => {
                    write!(f, "simulation name is {n} characters long (max {})", crate::ids::MAX_NAME_CHARS)
                }
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub use entities::{Party, PartyResult, SimulationRequest, SimulationSummary};
pub use errors::CoreError;
pub use ids::{AccountId, SimulationName, SnapshotId};
pub use snapshot::{SimulationSnapshot, SnapshotV1, SNAPSHOT_SCHEMA_V1};
