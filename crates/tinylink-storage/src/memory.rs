use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tinylink_core::store::{CreateOutcome, LinkStore, Result};
use tinylink_core::{LinkRecord, Token};

/// Process-local [`LinkStore`] over a sharded concurrent map.
///
/// `create_if_absent` goes through the entry API, which holds the shard
/// lock for the token across the check and the insert.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    links: DashMap<Token, String>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Snapshot of every stored link, in no particular order.
    pub fn records(&self) -> Vec<LinkRecord> {
        self.links
            .iter()
            .map(|entry| LinkRecord::new(entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn find_by_token(&self, token: &Token) -> Result<Option<String>> {
        Ok(self.links.get(token).map(|target| target.value().clone()))
    }

    async fn create_if_absent(&self, token: &Token, target: &str) -> Result<CreateOutcome> {
        match self.links.entry(token.clone()) {
            Entry::Occupied(existing) => Ok(CreateOutcome::existing(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(target.to_owned());
                Ok(CreateOutcome::created(target))
            }
        }
    }

    async fn update_target(&self, token: &Token, target: &str) -> Result<bool> {
        match self.links.get_mut(token) {
            Some(mut stored) => {
                *stored = target.to_owned();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn token(s: &str) -> Token {
        Token::new_unchecked(s)
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = InMemoryLinkStore::new();
        assert!(store
            .find_by_token(&token("sDikWv9ct8cM"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = InMemoryLinkStore::new();
        let t = token("sDikWv9ct8cM");

        let outcome = store
            .create_if_absent(&t, "https://example.com/a")
            .await
            .unwrap();
        assert_eq!(outcome, CreateOutcome::created("https://example.com/a"));

        let found = store.find_by_token(&t).await.unwrap();
        assert_eq!(found.as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn create_keeps_existing_row() {
        let store = InMemoryLinkStore::new();
        let t = token("sDikWv9ct8cM");

        store
            .create_if_absent(&t, "https://one.example")
            .await
            .unwrap();
        let outcome = store
            .create_if_absent(&t, "https://two.example")
            .await
            .unwrap();

        assert_eq!(outcome, CreateOutcome::existing("https://one.example"));
        assert_eq!(
            store.find_by_token(&t).await.unwrap().as_deref(),
            Some("https://one.example")
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn tokens_are_case_sensitive() {
        let store = InMemoryLinkStore::new();

        store
            .create_if_absent(&token("abcdefghijkm"), "https://lower.example")
            .await
            .unwrap();
        let outcome = store
            .create_if_absent(&token("ABCDEFGHJKLM"), "https://upper.example")
            .await
            .unwrap();

        assert!(outcome.created);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn update_target_overwrites_existing_row_only() {
        let store = InMemoryLinkStore::new();
        let t = token("sDikWv9ct8cM");

        assert!(!store.update_target(&t, "https://new.example").await.unwrap());
        assert!(store.is_empty());

        store
            .create_if_absent(&t, "https://old.example")
            .await
            .unwrap();
        assert!(store.update_target(&t, "https://new.example").await.unwrap());
        assert_eq!(
            store.find_by_token(&t).await.unwrap().as_deref(),
            Some("https://new.example")
        );
    }

    #[tokio::test]
    async fn concurrent_creates_insert_exactly_once() {
        let store = Arc::new(InMemoryLinkStore::new());
        let t = token("sDikWv9ct8cM");
        let mut handles = vec![];

        for _ in 0..32 {
            let store = Arc::clone(&store);
            let t = t.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create_if_absent(&t, "https://example.com/a")
                    .await
                    .unwrap()
            }));
        }

        let mut created = 0;
        for handle in handles {
            let outcome = handle.await.unwrap();
            assert_eq!(outcome.target, "https://example.com/a");
            if outcome.created {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(
            store.records(),
            vec![LinkRecord::new(t, "https://example.com/a")]
        );
    }
}
