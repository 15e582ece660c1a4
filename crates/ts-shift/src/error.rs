use ts_store::StoreError;
use ts_token::TokenError;
use ts_types::ErrorKind;

/// Errors from shift lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ShiftError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ShiftError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Conflict(_) => ErrorKind::Conflict,
            // minting failed; the caller's input was fine
            Self::Token(_) => ErrorKind::Internal,
            Self::Store(e) => e.kind(),
        }
    }
}

pub type ShiftResult<T> = Result<T, ShiftError>;
