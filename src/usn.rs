// src/usn.rs

use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::error::ResultError;

/// College code every accepted USN starts with.
pub const USN_PREFIX: &str = "4JC";
/// Length of a normalized USN, prefix included.
pub const USN_LEN: usize = 10;

/// A University Seat Number that passed validation.
///
/// Always trimmed and upper-cased. The only way to get one is through
/// [`Usn::parse`] (or `str::parse`), so holding a `Usn` means the shape
/// check already happened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Usn(String);

impl Usn {
    /// Normalize `raw` (trim + upper-case) and check length and prefix.
    pub fn parse(raw: &str) -> Result<Self, ResultError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.chars().count() != USN_LEN || !normalized.starts_with(USN_PREFIX) {
            return Err(ResultError::InvalidUsn {
                input: raw.to_string(),
            });
        }
        Ok(Usn(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Usn {
    type Err = ResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Usn::parse(s)
    }
}

impl fmt::Display for Usn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Usn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
