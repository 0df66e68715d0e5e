use async_trait::async_trait;
use moka::future::Cache;
use tinylink_core::{LinkCache, Token};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// A concurrent in-memory [`LinkCache`] backed by Moka.
///
/// Moka admits and evicts with TinyLFU rather than strict recency, and
/// applies evictions in batches. The entry count can briefly exceed the
/// configured capacity until pending maintenance runs. Use
/// [`LruLinkCache`](crate::LruLinkCache) where an exact bound matters.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    cache: Cache<Token, String>,
}

impl MokaLinkCache {
    pub fn with_capacity(max_capacity: u64) -> Self {
        MokaCacheConfig::builder()
            .max_capacity(max_capacity)
            .build()
            .into()
    }

    pub fn builder() -> MokaCacheConfigBuilder {
        MokaCacheConfig::builder()
    }

    /// Approximate number of cached entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Flushes pending evictions so that `entry_count` is exact.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get(&self, token: &Token) -> Option<String> {
        match self.cache.get(token).await {
            Some(target) => {
                trace!(token = %token, "Cache hit in Moka");
                Some(target)
            }
            None => {
                trace!(token = %token, "Cache miss in Moka");
                None
            }
        }
    }

    async fn put(&self, token: &Token, target: &str) {
        self.cache.insert(token.clone(), target.to_owned()).await;
        trace!(token = %token, "Cached target in Moka");
    }

    async fn invalidate(&self, token: &Token) {
        self.cache.invalidate(token).await;
        debug!(token = %token, "Removed target from Moka cache (if present)");
    }
}

/// Settings for a [`MokaLinkCache`].
#[derive(Debug, TypedBuilder)]
pub struct MokaCacheConfig {
    /// Maximum number of entries the cache holds once maintenance has run.
    #[builder(default = 8192)]
    max_capacity: u64,
}

impl From<MokaCacheConfig> for MokaLinkCache {
    fn from(config: MokaCacheConfig) -> Self {
        MokaLinkCache {
            cache: Cache::builder().max_capacity(config.max_capacity).build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> Token {
        Token::new_unchecked(s)
    }

    #[tokio::test]
    async fn get_and_put() {
        let cache = MokaLinkCache::with_capacity(100);
        let t = token("sDikWv9ct8cM");

        assert!(cache.get(&t).await.is_none());

        cache.put(&t, "https://example.com/a").await;

        assert_eq!(
            cache.get(&t).await.as_deref(),
            Some("https://example.com/a")
        );
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let cache = MokaLinkCache::with_capacity(100);
        let t = token("sDikWv9ct8cM");

        cache.invalidate(&t).await;

        cache.put(&t, "https://example.com/a").await;
        cache.invalidate(&t).await;
        assert!(cache.get(&t).await.is_none());

        cache.invalidate(&t).await;
        assert!(cache.get(&t).await.is_none());
    }

    #[tokio::test]
    async fn entry_count_is_bounded_after_maintenance() {
        let cache = MokaLinkCache::with_capacity(50);

        for i in 0..200 {
            let t = token(&format!("tok{i:0>9}"));
            cache.put(&t, &format!("https://example.com/{i}")).await;
        }
        cache.run_pending_tasks().await;

        assert!(cache.entry_count() <= 50, "{}", cache.entry_count());
    }

    #[tokio::test]
    async fn entries_never_expire_by_time() {
        let cache: MokaLinkCache = MokaLinkCache::builder().build().into();
        let policy = cache.cache.policy();

        assert_eq!(policy.max_capacity(), Some(8192));
        assert_eq!(policy.time_to_idle(), None);
        assert_eq!(policy.time_to_live(), None);
    }
}
