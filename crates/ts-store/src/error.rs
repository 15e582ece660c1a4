use std::path::PathBuf;

use ts_types::ErrorKind;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record addressed by an update does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness rule would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend cannot serve requests (poisoned lock, failed persist).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The data file exists but does not hold a valid record set.
    #[error("corrupt store file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Serialization(_) => ErrorKind::Internal,
            Self::Unavailable(_) | Self::Io(_) | Self::Corrupt { .. } => ErrorKind::StoreUnavailable,
        }
    }

    pub(crate) fn poisoned() -> Self {
        Self::Unavailable("lock poisoned".into())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_never_not_found() {
        let io = StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(StoreError::poisoned().kind(), ErrorKind::StoreUnavailable);
        assert_eq!(StoreError::NotFound("shift".into()).kind(), ErrorKind::NotFound);
    }
}
