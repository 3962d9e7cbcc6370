//! Validated GitHub handle.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

const MAX_LEN: usize = 39;

/// A handle restricted to `[A-Za-z0-9-]{1,39}`.
///
/// Only validated handles are ever interpolated into the upstream URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Check whether `value` is an acceptable handle, verbatim.
    pub fn is_valid(value: &str) -> bool {
        (1..=MAX_LEN).contains(&value.len())
            && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    }

    /// Parse a handle, rejecting anything outside the allowed set.
    pub fn parse(value: &str) -> Result<Self> {
        if Self::is_valid(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::validation(format!("invalid username {value:?}")))
        }
    }

    /// Normalize untrusted input: valid handles pass through unchanged,
    /// missing or invalid input becomes `default`.
    pub fn sanitize(input: Option<&str>, default: &Username) -> Self {
        match input {
            Some(value) if Self::is_valid(value) => Self(value.to_string()),
            Some(value) => {
                log::debug!("Replacing invalid username {value:?} with {default}");
                default.clone()
            }
            None => default.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}
