//! Simulation persistence seam.
//!
//! The request processor never touches storage; the CRUD layer talks to a
//! `SimulationStore` handed to it. Implementations guard their own state,
//! so every method takes `&self` and a store can be shared across threads.
//! Each call is atomic per snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dh_core::{AccountId, SimulationName, SimulationSnapshot, SnapshotId};

use crate::IoResult;

pub mod memory;
pub mod sqlite;

/// Header row for listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationListing {
    pub id: SnapshotId,
    pub name: SimulationName,
    pub saved_at: DateTime<Utc>,
}

/// A saved simulation read back in full.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredSimulation {
    pub id: SnapshotId,
    pub account: AccountId,
    pub name: SimulationName,
    pub saved_at: DateTime<Utc>,
    pub snapshot: SimulationSnapshot,
}

pub trait SimulationStore: Send + Sync {
    /// Persist a new snapshot. Fails with `IoError::Conflict` when the account
    /// already has a simulation with that name.
    fn save(&self, account: AccountId, name: &SimulationName, snapshot: &SimulationSnapshot) -> IoResult<SnapshotId>;

    /// Whether `account` has a simulation called `name`, ignoring `exclude`.
    fn find_by_name(&self, account: AccountId, name: &SimulationName, exclude: Option<SnapshotId>) -> IoResult<bool>;

    /// `None` when the id does not exist or belongs to another account.
    fn get(&self, account: AccountId, id: SnapshotId) -> IoResult<Option<StoredSimulation>>;

    /// Replace name and snapshot; `false` when not found for this account.
    fn update(
        &self,
        account: AccountId,
        id: SnapshotId,
        name: &SimulationName,
        snapshot: &SimulationSnapshot,
    ) -> IoResult<bool>;

    /// `false` when not found for this account.
    fn delete(&self, account: AccountId, id: SnapshotId) -> IoResult<bool>;

    /// Newest first (by save time, then by id).
    fn list(&self, account: AccountId) -> IoResult<Vec<SimulationListing>>;
}
