use crate::error::StorageError;
use crate::token::Token;
use async_trait::async_trait;
use serde::Serialize;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// One persisted link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub token: Token,
    pub target: String,
}

impl LinkRecord {
    pub fn new(token: Token, target: impl Into<String>) -> Self {
        Self {
            token,
            target: target.into(),
        }
    }
}

/// Outcome of [`LinkStore::create_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The target now stored under the token. When `created` is false this
    /// is the pre-existing row, unchanged.
    pub target: String,
    /// Whether this call inserted the row.
    pub created: bool,
}

impl CreateOutcome {
    pub fn created(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            created: true,
        }
    }

    pub fn existing(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            created: false,
        }
    }
}

/// Durable mapping from token to target, unique on token.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Retrieves the target stored for a token.
    /// Returns `None` if no row exists.
    async fn find_by_token(&self, token: &Token) -> Result<Option<String>>;

    /// Atomically inserts `(token, target)` unless a row for `token` exists.
    ///
    /// Implementations must resolve concurrent callers racing on the same
    /// token inside the store (unique constraint or equivalent), never with a
    /// separate existence check.
    async fn create_if_absent(&self, token: &Token, target: &str) -> Result<CreateOutcome>;

    /// Overwrites the target of an existing row.
    ///
    /// Only used to repair rows whose target was stored in a different
    /// encoding. Returns `true` if a row was updated.
    async fn update_target(&self, token: &Token, target: &str) -> Result<bool>;
}
