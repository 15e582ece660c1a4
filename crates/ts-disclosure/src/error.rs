use ts_store::StoreError;
use ts_types::ErrorKind;

/// Errors from disclosure operations.
///
/// Bad tokens are not errors here; they produce an unverified result.
#[derive(Debug, thiserror::Error)]
pub enum DisclosureError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DisclosureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Store(e) => e.kind(),
        }
    }
}

pub type DisclosureResult<T> = Result<T, DisclosureError>;
