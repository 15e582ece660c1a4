use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown risk tier: {0}")]
    UnknownTier(String),
}

/// Classification shared by every service error.
///
/// Each crate keeps its own error enum; `kind()` on those enums maps onto
/// this set so the HTTP layer can pick a status code in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A user, shift, or binding does not exist.
    NotFound,
    /// Duplicate active shift, duplicate active binding, duplicate contact.
    Conflict,
    /// Role mismatch or wrong supervisor.
    Forbidden,
    /// Malformed request fields.
    InvalidInput,
    /// Malformed trust token.
    Decode,
    /// The record store could not be reached.
    StoreUnavailable,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::InvalidInput => "invalid_input",
            Self::Decode => "decode_error",
            Self::StoreUnavailable => "store_unavailable",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TypeError> for ErrorKind {
    fn from(_: TypeError) -> Self {
        Self::InvalidInput
    }
}
