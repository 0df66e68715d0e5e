use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tinylink_core::{LinkCache, Token};
use tracing::{debug, trace};

/// Default number of entries held by the resolution cache.
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(8192) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// A strict least-recently-used implementation of [`LinkCache`].
///
/// Capacity is fixed at construction. Once full, every insert of a new
/// token evicts exactly one entry: the one accessed least recently, where
/// both `get` hits and `put` count as accesses.
///
/// The map sits behind a single mutex that is held only for the O(1) map
/// operation itself, never across an await point.
#[derive(Debug)]
pub struct LruLinkCache {
    inner: Mutex<LruCache<Token, String>>,
}

impl LruLinkCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> NonZeroUsize {
        self.inner.lock().cap()
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Checks for an entry without touching its recency.
    pub fn contains(&self, token: &Token) -> bool {
        self.inner.lock().contains(token)
    }
}

impl Default for LruLinkCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl LinkCache for LruLinkCache {
    async fn get(&self, token: &Token) -> Option<String> {
        let hit = self.inner.lock().get(token).cloned();
        match hit {
            Some(target) => {
                trace!(token = %token, "Cache hit in LRU");
                Some(target)
            }
            None => {
                trace!(token = %token, "Cache miss in LRU");
                None
            }
        }
    }

    async fn put(&self, token: &Token, target: &str) {
        let evicted = self.inner.lock().push(token.clone(), target.to_owned());
        match evicted {
            Some((evicted, _)) if evicted != *token => {
                debug!(token = %token, evicted = %evicted, "Cached target in LRU, evicted oldest entry");
            }
            _ => trace!(token = %token, "Cached target in LRU"),
        }
    }

    async fn invalidate(&self, token: &Token) {
        if self.inner.lock().pop(token).is_some() {
            debug!(token = %token, "Removed target from LRU cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn token(i: usize) -> Token {
        // Base58 digits only, padded to twelve characters
        Token::new_unchecked(format!("{:1>12}", i))
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[tokio::test]
    async fn get_and_put() {
        let cache = LruLinkCache::default();
        let t = token(1);

        assert!(cache.get(&t).await.is_none());

        cache.put(&t, "https://example.com").await;

        assert_eq!(cache.get(&t).await.as_deref(), Some("https://example.com"));
        assert_eq!(cache.capacity().get(), 8192);
    }

    #[tokio::test]
    async fn put_overwrites_existing_entry() {
        let cache = LruLinkCache::new(capacity(2));
        let t = token(1);

        cache.put(&t, "https://old.example").await;
        cache.put(&t, "https://new.example").await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&t).await.as_deref(), Some("https://new.example"));
    }

    #[tokio::test]
    async fn capacity_plus_one_evicts_least_recently_used() {
        let cache = LruLinkCache::new(capacity(4));
        for i in 1..=4 {
            cache.put(&token(i), &format!("https://example.com/{i}")).await;
        }

        cache.put(&token(5), "https://example.com/5").await;

        assert_eq!(cache.len(), 4);
        assert!(!cache.contains(&token(1)));
        for i in 2..=5 {
            assert!(cache.contains(&token(i)), "token {i} should be retained");
        }
    }

    #[tokio::test]
    async fn get_refreshes_recency() {
        let cache = LruLinkCache::new(capacity(3));
        for i in 1..=3 {
            cache.put(&token(i), &format!("https://example.com/{i}")).await;
        }

        // token 1 becomes most recent, token 2 is now the eviction candidate
        assert!(cache.get(&token(1)).await.is_some());
        cache.put(&token(4), "https://example.com/4").await;

        assert_eq!(cache.len(), 3);
        assert!(cache.contains(&token(1)));
        assert!(!cache.contains(&token(2)));
        assert!(cache.contains(&token(3)));
        assert!(cache.contains(&token(4)));
    }

    #[tokio::test]
    async fn contains_does_not_refresh_recency() {
        let cache = LruLinkCache::new(capacity(2));
        cache.put(&token(1), "https://example.com/1").await;
        cache.put(&token(2), "https://example.com/2").await;

        assert!(cache.contains(&token(1)));
        cache.put(&token(3), "https://example.com/3").await;

        assert!(!cache.contains(&token(1)));
    }

    #[tokio::test]
    async fn invalidate_removes_entry_and_is_idempotent() {
        let cache = LruLinkCache::new(capacity(2));
        let t = token(1);

        cache.put(&t, "https://example.com").await;
        cache.invalidate(&t).await;
        assert!(cache.get(&t).await.is_none());
        assert!(cache.is_empty());

        cache.invalidate(&t).await;
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn concurrent_access_respects_capacity() {
        let cache = Arc::new(LruLinkCache::new(capacity(64)));
        let mut handles = vec![];

        for worker in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    let t = token(worker * 1000 + i + 1);
                    cache.put(&t, &format!("https://example.com/{worker}/{i}")).await;
                    let _ = cache.get(&t).await;
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len(), 64);
    }
}
