use thiserror::Error;
use ts_types::ErrorKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("token is empty")]
    Empty,

    #[error("invalid token encoding: {0}")]
    Encoding(String),

    #[error("malformed token claims: {0}")]
    Malformed(String),

    #[error("token is missing its integrity tag")]
    MissingTag,

    #[error("token integrity tag does not match")]
    BadTag,

    #[error("invalid token key: {0}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Serialization(_) => ErrorKind::Internal,
            Self::InvalidKey(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::Decode,
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
