// In-memory simulation store (tests, throwaway sessions).

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use dh_core::{AccountId, SimulationName, SimulationSnapshot, SnapshotId};

use super::{SimulationListing, SimulationStore, StoredSimulation};
use crate::{IoError, IoResult};

#[derive(Debug, Clone)]
struct Row {
    account: AccountId,
    name: SimulationName,
    saved_at: DateTime<Utc>,
    snapshot: SimulationSnapshot,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    rows: BTreeMap<SnapshotId, Row>,
}

impl State {
    fn name_taken(&self, account: AccountId, name: &SimulationName, exclude: Option<SnapshotId>) -> bool {
        self.rows
            .iter()
            .any(|(id, r)| r.account == account && r.name == *name && Some(*id) != exclude)
    }
}

/// Mutex-guarded map keyed by snapshot id. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> IoResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| IoError::Poisoned)
    }
}

impl SimulationStore for MemoryStore {
    fn save(&self, account: AccountId, name: &SimulationName, snapshot: &SimulationSnapshot) -> IoResult<SnapshotId> {
        let mut st = self.state()?;
        if st.name_taken(account, name, None) {
            return Err(IoError::Conflict(name.to_string()));
        }
        st.next_id += 1;
        let id = SnapshotId(st.next_id);
        st.rows.insert(
            id,
            Row { account, name: name.clone(), saved_at: Utc::now(), snapshot: snapshot.clone() },
        );
        Ok(id)
    }

    fn find_by_name(&self, account: AccountId, name: &SimulationName, exclude: Option<SnapshotId>) -> IoResult<bool> {
        Ok(self.state()?.name_taken(account, name, exclude))
    }

    fn get(&self, account: AccountId, id: SnapshotId) -> IoResult<Option<StoredSimulation>> {
        let st = self.state()?;
        Ok(st.rows.get(&id).filter(|r| r.account == account).map(|r| StoredSimulation {
            id,
            account,
            name: r.name.clone(),
            saved_at: r.saved_at,
            snapshot: r.snapshot.clone(),
        }))
    }

    fn update(
        &self,
        account: AccountId,
        id: SnapshotId,
        name: &SimulationName,
        snapshot: &SimulationSnapshot,
    ) -> IoResult<bool> {
        let mut st = self.state()?;
        if !st.rows.get(&id).is_some_and(|r| r.account == account) {
            return Ok(false);
        }
        if st.name_taken(account, name, Some(id)) {
            return Err(IoError::Conflict(name.to_string()));
        }
        if let Some(row) = st.rows.get_mut(&id) {
            row.name = name.clone();
            row.snapshot = snapshot.clone();
            row.saved_at = Utc::now();
        }
        Ok(true)
    }

    fn delete(&self, account: AccountId, id: SnapshotId) -> IoResult<bool> {
        let mut st = self.state()?;
        if st.rows.get(&id).is_some_and(|r| r.account == account) {
            st.rows.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn list(&self, account: AccountId) -> IoResult<Vec<SimulationListing>> {
        let st = self.state()?;
        let mut out: Vec<SimulationListing> = st
            .rows
            .iter()
            .filter(|(_, r)| r.account == account)
            .map(|(id, r)| SimulationListing { id: *id, name: r.name.clone(), saved_at: r.saved_at })
            .collect();
        out.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}
