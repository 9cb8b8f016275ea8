// SQLite persistence for saved simulations.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, warn};

use dh_core::{AccountId, SimulationName, SimulationSnapshot, SnapshotId};

use super::{SimulationListing, SimulationStore, StoredSimulation};
use crate::canonical_json::canonical_bytes;
use crate::hasher::sha256_hex;
use crate::{IoError, IoResult};

/// One table, one row per saved simulation. The payload is the canonical JSON
/// of the snapshot and `payload_sha256` its digest, checked on every read.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at `path` and ensure the schema exists.
    /// `":memory:"` gives an ephemeral database.
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS simulations (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id     INTEGER NOT NULL,
                name           TEXT NOT NULL,
                schema         TEXT NOT NULL,
                payload        TEXT NOT NULL,
                payload_sha256 TEXT NOT NULL,
                saved_at       TEXT NOT NULL,
                UNIQUE(account_id, name)
            );

            CREATE INDEX IF NOT EXISTS idx_simulations_account_saved
                ON simulations(account_id, saved_at);
            ",
        )?;

        debug!(path = %path.display(), "simulation store ready");
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> IoResult<Self> {
        Self::open(":memory:")
    }

    fn conn(&self) -> IoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| IoError::Poisoned)
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(id: SnapshotId, raw: &str) -> IoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| IoError::Integrity { id, msg: format!("bad saved_at {raw:?}: {e}") })
}

fn parse_name(id: SnapshotId, raw: &str) -> IoResult<SimulationName> {
    SimulationName::new(raw).map_err(|e| IoError::Integrity { id, msg: e.to_string() })
}

/// Map a UNIQUE violation to `Conflict`; everything else stays a db error.
fn map_write_err(e: rusqlite::Error, name: &SimulationName) -> IoError {
    if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
        IoError::Conflict(name.to_string())
    } else {
        IoError::Db(e)
    }
}

/// Canonical payload plus its digest.
fn encode(snapshot: &SimulationSnapshot) -> IoResult<(String, String)> {
    let bytes = canonical_bytes(snapshot)?;
    let digest = sha256_hex(&bytes);
    let text = String::from_utf8(bytes).map_err(|e| IoError::Json { line: 0, column: 0, msg: e.to_string() })?;
    Ok((text, digest))
}

fn decode(id: SnapshotId, payload: &str, expected: &str) -> IoResult<SimulationSnapshot> {
    let actual = sha256_hex(payload.as_bytes());
    if actual != expected {
        warn!(%id, %expected, %actual, "snapshot digest mismatch");
        return Err(IoError::Integrity { id, msg: format!("digest mismatch: expected {expected}, got {actual}") });
    }
    serde_json::from_str(payload).map_err(|e| IoError::Integrity { id, msg: e.to_string() })
}

impl SimulationStore for SqliteStore {
    fn save(&self, account: AccountId, name: &SimulationName, snapshot: &SimulationSnapshot) -> IoResult<SnapshotId> {
        let (payload, digest) = encode(snapshot)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO simulations (account_id, name, schema, payload, payload_sha256, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![account.get(), name.as_str(), snapshot.schema(), payload, digest, timestamp(Utc::now())],
        )
        .map_err(|e| map_write_err(e, name))?;
        Ok(SnapshotId(conn.last_insert_rowid()))
    }

    fn find_by_name(&self, account: AccountId, name: &SimulationName, exclude: Option<SnapshotId>) -> IoResult<bool> {
        let conn = self.conn()?;
        let hit: Option<i64> = conn
            .query_row(
                "SELECT id FROM simulations
                 WHERE account_id = ?1 AND name = ?2 AND (?3 IS NULL OR id <> ?3)
                 LIMIT 1",
                params![account.get(), name.as_str(), exclude.map(SnapshotId::get)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    fn get(&self, account: AccountId, id: SnapshotId) -> IoResult<Option<StoredSimulation>> {
        let row: Option<(String, String, String, String)> = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT name, payload, payload_sha256, saved_at FROM simulations
                 WHERE id = ?1 AND account_id = ?2",
                params![id.get(), account.get()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?
        };

        let Some((name, payload, digest, saved_at)) = row else {
            return Ok(None);
        };
        Ok(Some(StoredSimulation {
            id,
            account,
            name: parse_name(id, &name)?,
            saved_at: parse_timestamp(id, &saved_at)?,
            snapshot: decode(id, &payload, &digest)?,
        }))
    }

    fn update(
        &self,
        account: AccountId,
        id: SnapshotId,
        name: &SimulationName,
        snapshot: &SimulationSnapshot,
    ) -> IoResult<bool> {
        let (payload, digest) = encode(snapshot)?;
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE simulations
                 SET name = ?1, schema = ?2, payload = ?3, payload_sha256 = ?4, saved_at = ?5
                 WHERE id = ?6 AND account_id = ?7",
                params![
                    name.as_str(),
                    snapshot.schema(),
                    payload,
                    digest,
                    timestamp(Utc::now()),
                    id.get(),
                    account.get()
                ],
            )
            .map_err(|e| map_write_err(e, name))?;
        Ok(changed > 0)
    }

    fn delete(&self, account: AccountId, id: SnapshotId) -> IoResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM simulations WHERE id = ?1 AND account_id = ?2",
            params![id.get(), account.get()],
        )?;
        Ok(changed > 0)
    }

    fn list(&self, account: AccountId) -> IoResult<Vec<SimulationListing>> {
        let raw: Vec<(i64, String, String)> = {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(
                "SELECT id, name, saved_at FROM simulations
                 WHERE account_id = ?1
                 ORDER BY saved_at DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![account.get()], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
            rows.collect::<Result<_, _>>()?
        };

        raw.into_iter()
            .map(|(id, name, saved_at)| {
                let id = SnapshotId(id);
                Ok(SimulationListing { id, name: parse_name(id, &name)?, saved_at: parse_timestamp(id, &saved_at)? })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sims.db");
        drop(SqliteStore::open(&path).unwrap());
        // Second open must not fail on existing table/index.
        SqliteStore::open(&path).unwrap();
    }

    #[test]
    fn timestamps_sort_lexically() {
        let a = DateTime::parse_from_rfc3339("2024-01-01T00:00:00.000001Z").unwrap().with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2024-01-01T00:00:00.000010Z").unwrap().with_timezone(&Utc);
        assert!(timestamp(a) < timestamp(b));
        assert_eq!(parse_timestamp(SnapshotId(1), &timestamp(a)).unwrap(), a);
    }
}
