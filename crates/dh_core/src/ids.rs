//! crates/dh_core/src/ids.rs
//! Account/snapshot identifiers and the validated simulation name.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// Upper bound on a saved simulation name, counted in chars.
pub const MAX_NAME_CHARS: usize = 128;

macro_rules! integer_id_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            #[inline] pub fn get(self) -> i64 { self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map($name)
                    .map_err(|_| CoreError::InvalidId(s.to_string()))
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(v: i64) -> Self { $name(v) }
        }
    };
}

integer_id_newtype!(
    /// Opaque account identifier handed over by the account service.
    AccountId
);

integer_id_newtype!(
    /// Row identifier of a saved simulation (unique across accounts).
    SnapshotId
);

/// Name of a saved simulation: trimmed, non-empty, at most `MAX_NAME_CHARS`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct SimulationName(String);

impl SimulationName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::BlankName);
        }
        let n = trimmed.chars().count();
        if n > MAX_NAME_CHARS {
            return Err(CoreError::NameTooLong(n));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SimulationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SimulationName {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for SimulationName {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        SimulationName::new(&s).map_err(serde::de::Error::custom)
    }
}
