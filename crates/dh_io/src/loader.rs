//! crates/dh_io/src/loader.rs
//! Read `SimulationRequest` documents from files, readers or strings.
//!
//! Decoding only checks shape; business rules (seat count, negative votes,
//! threshold range…) are left to `dh_pipeline::validate` so every caller gets
//! the same error codes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use dh_core::SimulationRequest;
use tracing::debug;

use crate::{IoError, IoResult};

/// Largest request document accepted (1 MiB).
pub const MAX_INPUT_BYTES: u64 = 1024 * 1024;

pub fn parse_request(text: &str) -> IoResult<SimulationRequest> {
    Ok(serde_json::from_str(text)?)
}

/// Read at most `MAX_INPUT_BYTES` from `reader` and decode.
pub fn load_request_from_reader<R: Read>(reader: R) -> IoResult<SimulationRequest> {
    let mut buf = String::new();
    let n = reader.take(MAX_INPUT_BYTES + 1).read_to_string(&mut buf)?;
    if n as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("request larger than {MAX_INPUT_BYTES} bytes")));
    }
    parse_request(&buf)
}

pub fn load_request(path: &Path) -> IoResult<SimulationRequest> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let len = f.metadata().map(|m| m.len()).unwrap_or(0);
    if len > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!("{} is {len} bytes (max {MAX_INPUT_BYTES})", path.display())));
    }
    debug!(path = %path.display(), bytes = len, "loading simulation request");
    load_request_from_reader(f)
}
