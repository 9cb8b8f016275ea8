//! crates/dh_io/src/service.rs
//! CRUD rules for saved simulations on top of any `SimulationStore`.
//!
//! Order of checks on save/update: name → duplicate → process → persist.
//! A simulation is only ever stored together with the results it produced;
//! results are recomputed from the submitted request, never taken from the
//! caller.

use thiserror::Error;
use tracing::{info, instrument};

use dh_core::{AccountId, CoreError, SimulationName, SimulationRequest, SimulationSnapshot, SimulationSummary, SnapshotId};
use dh_pipeline::PipelineError;

use crate::store::{SimulationListing, SimulationStore, StoredSimulation};
use crate::IoError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid simulation name: {0}")]
    InvalidName(#[from] CoreError),

    #[error("a simulation named {0:?} already exists")]
    DuplicateName(String),

    #[error("simulation {0} not found")]
    NotFound(SnapshotId),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Store(IoError),
}

impl From<IoError> for ServiceError {
    fn from(e: IoError) -> Self {
        match e {
            // Lost a race with a concurrent save of the same name.
            IoError::Conflict(name) => ServiceError::DuplicateName(name),
            other => ServiceError::Store(other),
        }
    }
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidName(_) => "Name.Invalid",
            ServiceError::DuplicateName(_) => "Name.Duplicate",
            ServiceError::NotFound(_) => "Simulation.NotFound",
            ServiceError::Pipeline(p) => p.code(),
            ServiceError::Store(_) => "Store.Failure",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct SimulationService<S> {
    store: S,
}

impl<S: SimulationStore> SimulationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stateless calculation; nothing is stored.
    pub fn calculate(&self, request: &SimulationRequest) -> ServiceResult<(SimulationSummary, SimulationSnapshot)> {
        Ok(dh_pipeline::process(request)?)
    }

    /// `true` when `account` could use `name` (optionally for simulation `exclude`).
    pub fn name_available(&self, account: AccountId, name: &str, exclude: Option<SnapshotId>) -> ServiceResult<bool> {
        let name = SimulationName::new(name)?;
        Ok(!self.store.find_by_name(account, &name, exclude)?)
    }

    #[instrument(skip_all, fields(%account))]
    pub fn save(
        &self,
        account: AccountId,
        name: &str,
        request: &SimulationRequest,
    ) -> ServiceResult<(SnapshotId, SimulationSummary)> {
        let name = SimulationName::new(name)?;
        if self.store.find_by_name(account, &name, None)? {
            return Err(ServiceError::DuplicateName(name.into_string()));
        }
        let (summary, snapshot) = dh_pipeline::process(request)?;
        let snapshot = snapshot.with_name(name.as_str());
        let id = self.store.save(account, &name, &snapshot)?;
        info!(%id, name = %name, "simulation saved");
        Ok((id, summary))
    }

    #[instrument(skip_all, fields(%account, %id))]
    pub fn update(
        &self,
        account: AccountId,
        id: SnapshotId,
        name: &str,
        request: &SimulationRequest,
    ) -> ServiceResult<SimulationSummary> {
        let name = SimulationName::new(name)?;
        if self.store.find_by_name(account, &name, Some(id))? {
            return Err(ServiceError::DuplicateName(name.into_string()));
        }
        let (summary, snapshot) = dh_pipeline::process(request)?;
        let snapshot = snapshot.with_name(name.as_str());
        if !self.store.update(account, id, &name, &snapshot)? {
            return Err(ServiceError::NotFound(id));
        }
        info!(name = %name, "simulation updated");
        Ok(summary)
    }

    pub fn get(&self, account: AccountId, id: SnapshotId) -> ServiceResult<StoredSimulation> {
        self.store.get(account, id)?.ok_or(ServiceError::NotFound(id))
    }

    #[instrument(skip_all, fields(%account, %id))]
    pub fn delete(&self, account: AccountId, id: SnapshotId) -> ServiceResult<()> {
        if !self.store.delete(account, id)? {
            return Err(ServiceError::NotFound(id));
        }
        info!("simulation deleted");
        Ok(())
    }

    pub fn list(&self, account: AccountId) -> ServiceResult<Vec<SimulationListing>> {
        Ok(self.store.list(account)?)
    }
}
