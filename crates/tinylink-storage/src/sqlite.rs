use crate::sql::{is_unique_violation, map_sqlx_error, vanished_row, PoolConfig};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tinylink_core::store::{CreateOutcome, LinkStore, Result};
use tinylink_core::Token;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/sqlite/links.sql");

/// SQLite implementation of [`LinkStore`].
///
/// The schema is created on connect if it does not exist yet. The
/// column collation is SQLite's default `BINARY`, so tokens compare
/// case-sensitively.
#[derive(Debug, Clone)]
pub struct SqliteLinkStore {
    pool: SqlitePool,
}

impl SqliteLinkStore {
    /// Wraps an existing pool. The caller is responsible for the schema.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `database_url` and
    /// ensures the schema. Lock waits share the pool's acquire timeout.
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true)
            .busy_timeout(config.acquire_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.migrate().await?;
        info!(database_url, "Opened SQLite link store");
        Ok(store)
    }

    /// A private in-memory database, gone when the store is dropped.
    ///
    /// Every pooled connection to `sqlite::memory:` would see its own empty
    /// database, so the pool is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the link table if it does not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("Ensured SQLite link schema");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LinkStore for SqliteLinkStore {
    async fn find_by_token(&self, token: &Token) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT target
            FROM short_link_map
            WHERE token = ?
            LIMIT 1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| row.try_get("target").map_err(map_sqlx_error))
            .transpose()
    }

    async fn create_if_absent(&self, token: &Token, target: &str) -> Result<CreateOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_link_map (token, target)
            VALUES (?, ?)
            "#,
        )
        .bind(token.as_str())
        .bind(target)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(CreateOutcome::created(target)),
            Err(err) if is_unique_violation(&err) => {
                debug!(token = %token, "Token already stored, reading existing row");
                let existing = self
                    .find_by_token(token)
                    .await?
                    .ok_or_else(|| vanished_row(token.as_str()))?;
                Ok(CreateOutcome::existing(existing))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn update_target(&self, token: &Token, target: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE short_link_map
            SET target = ?
            WHERE token = ?
            "#,
        )
        .bind(target)
        .bind(token.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
