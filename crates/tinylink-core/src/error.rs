use crate::token::Token;
use thiserror::Error;

/// Result type used by the shortener service and its callers.
pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Infrastructure failures reported by a [`LinkStore`](crate::store::LinkStore).
///
/// A missing row is not an error; stores report it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by [`Shortener`](crate::shortener::Shortener) operations.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    /// The token is well formed but no link exists for it.
    #[error("no link found for token '{0}'")]
    NotFound(String),
    /// The token or target was rejected before any store access.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The derived token already maps to a different target.
    ///
    /// Signals that the token space is too small or the codec misbehaves.
    #[error("token '{token}' already maps to a different target")]
    TokenCollision { token: Token },
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),
}

impl ShortenerError {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShortenerError::StoreUnavailable(_))
    }
}
