use crate::sql::{is_unique_violation, map_sqlx_error, vanished_row, PoolConfig};
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};
use tinylink_core::store::{CreateOutcome, LinkStore, Result};
use tinylink_core::Token;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/mysql/links.sql");

/// MySQL implementation of [`LinkStore`].
///
/// The token column uses the `utf8mb4_bin` collation. MySQL's default
/// collations are case-insensitive, which would make distinct base58
/// tokens such as `abc…` and `ABC…` collide on the unique key.
#[derive(Debug, Clone)]
pub struct MySqlLinkStore {
    pool: MySqlPool,
}

impl MySqlLinkStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Opens a new MySQL connection pool. Does not touch the schema.
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        info!("Connected to MySQL link store");
        Ok(Self::new(pool))
    }

    /// Creates the link table if it does not exist.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("Ensured MySQL link schema");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl LinkStore for MySqlLinkStore {
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

        let Some(row) = row else {
            return Ok(None);
        };

        let target: String = row.try_get("target").map_err(map_sqlx_error)?;
        Ok(Some(target))
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
