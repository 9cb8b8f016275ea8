//! crates/dh_io/src/lib.rs
//! I/O crate: everything that touches bytes, files or a database.
//!
//! - `canonical_json`: sorted-key compact JSON, atomic file writes
//! - `hasher`: SHA-256 digests over canonical bytes
//! - `loader`: reading `SimulationRequest` documents
//! - `store`: the `SimulationStore` seam plus in-memory and SQLite backends
//! - `service`: CRUD rules on top of a store (names, duplicates, ownership)

#![forbid(unsafe_code)]

use dh_core::SnapshotId;
use thiserror::Error;

/// Unified error for dh_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (read, create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with position when known.
    #[error("json error at line {line}, column {column}: {msg}")]
    Json { line: usize, column: usize, msg: String },

    /// Input larger than the loader accepts.
    #[error("limit exceeded: {0}")]
    Limit(String),

    /// Backend failure from SQLite.
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Unique (account, name) constraint hit at the store level.
    #[error("name already in use for this account: {0}")]
    Conflict(String),

    /// Stored payload does not match its digest or cannot be decoded.
    #[error("integrity check failed for simulation {id}: {msg}")]
    Integrity { id: SnapshotId, msg: String },

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json { line: e.line(), column: e.column(), msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod service;
pub mod store;

pub use service::{ServiceError, SimulationService};
pub use store::{memory::MemoryStore, sqlite::SqliteStore, SimulationListing, SimulationStore, StoredSimulation};

pub mod prelude {
    pub use crate::{
        IoError, IoResult, MemoryStore, ServiceError, SimulationListing, SimulationService, SimulationStore,
        SqliteStore, StoredSimulation,
    };
}
