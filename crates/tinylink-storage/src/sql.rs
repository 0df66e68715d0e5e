use std::time::Duration;
use tinylink_core::StorageError;
use typed_builder::TypedBuilder;

/// Connection pool settings shared by the SQL backends.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolConfig {
    #[builder(default = 5)]
    pub max_connections: u32,
    /// How long a caller may wait for a free connection.
    #[builder(default = Duration::from_secs(3))]
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

/// A unique violation was reported but the conflicting row cannot be read back.
pub(crate) fn vanished_row(token: &str) -> StorageError {
    StorageError::Operation(format!(
        "token {token} reported as taken but no row was found"
    ))
}
