//! crates/dh_io/src/hasher.rs
//!
//! SHA-256 digests over canonical snapshot bytes.
//!
//! - Use `sha256_canonical(..)` for JSON **values/structs** (goes through canonical_json).
//! - Use `sha256_hex(..)` for **raw bytes** (e.g. a payload column read back from SQLite).
//! - Hex digests are **lowercase**, 64 chars.

use serde::Serialize;
use sha2::{Digest, Sha256};

use dh_core::SimulationSnapshot;

use crate::canonical_json::canonical_bytes;
use crate::IoResult;

/// Display prefix for snapshot digests.
pub const SNAPSHOT_DIGEST_PREFIX: &str = "SIM:";

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&canonical_bytes(value)?))
}

/// `SIM:<hex64>` — content id of a snapshot.
pub fn snapshot_digest(snapshot: &SimulationSnapshot) -> IoResult<String> {
    Ok(format!("{SNAPSHOT_DIGEST_PREFIX}{}", sha256_canonical(snapshot)?))
}

/// Lowercase hex64 check.
pub fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert!(is_hex64(&h));
        assert!(!is_hex64(&h.to_uppercase()));
    }

    #[test]
    fn canonical_hashing_ignores_field_order() {
        #[derive(Serialize)]
        struct T {
            b: u32,
            a: u32,
        }
        let h1 = sha256_canonical(&T { b: 2, a: 1 }).unwrap();
        let h2 = sha256_canonical(&json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(h1, h2);
    }
}
