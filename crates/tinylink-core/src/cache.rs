use crate::token::Token;
use async_trait::async_trait;

/// A bounded cache for resolved targets.
///
/// This trait provides a domain-specific caching abstraction keyed by
/// [`Token`]. Entries are a view of store rows and are only dropped by the
/// capacity policy or an explicit [`invalidate`](LinkCache::invalidate).
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Get the cached target for a token.
    ///
    /// Returns `None` on a miss. A hit counts as an access for eviction.
    async fn get(&self, token: &Token) -> Option<String>;

    /// Store a target, possibly evicting another entry.
    async fn put(&self, token: &Token, target: &str);

    /// Remove the entry for a token.
    ///
    /// It is not an error if the key does not exist.
    async fn invalidate(&self, token: &Token);
}
