use crate::config::ServiceConfig;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tinylink_codec::Codec;
use tinylink_core::error::Result;
use tinylink_core::target::is_transport_form_of;
use tinylink_core::{
    LinkCache, LinkStore, ShortenOutcome, Shortener, ShortenerError, StorageError, Target, Token,
};
use tracing::{debug, info, trace, warn};

/// The concrete [`Shortener`].
///
/// Shortening derives the token from the target and writes through the
/// store's atomic `create_if_absent`; resolving reads through the cache.
/// The service holds no lock of its own, so concurrent callers only
/// contend inside the store and the cache.
///
/// Every store call is bounded by [`ServiceConfig::store_timeout`]; an
/// elapsed call is reported as [`StorageError::Timeout`].
#[derive(Debug)]
pub struct ShortenerService<S, C, K> {
    store: Arc<S>,
    cache: Arc<C>,
    codec: Arc<K>,
    config: ServiceConfig,
}

impl<S, C, K> Clone for ShortenerService<S, C, K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            codec: Arc::clone(&self.codec),
            config: self.config.clone(),
        }
    }
}

impl<S: LinkStore, C: LinkCache, K: Codec> ShortenerService<S, C, K> {
    pub fn new(store: S, cache: C, codec: K) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(cache), Arc::new(codec))
    }

    /// Builds a service over components the caller keeps handles to.
    pub fn from_shared(store: Arc<S>, cache: Arc<C>, codec: Arc<K>) -> Self {
        Self {
            store,
            cache,
            codec,
            config: ServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> std::result::Result<T, StorageError>
    where
        F: Future<Output = std::result::Result<T, StorageError>>,
    {
        let limit = self.config.store_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout_ms = limit.as_millis() as u64, "Store call timed out");
                Err(StorageError::Timeout(format!(
                    "{op} did not complete within {}ms",
                    limit.as_millis()
                )))
            }
        }
    }

    /// Brings a row stored in transport form up to the decoded form.
    async fn repair_legacy_row(&self, token: &Token, target: &Target) -> Result<()> {
        let updated = self
            .bounded("update_target", self.store.update_target(token, target.as_str()))
            .await?;
        self.cache.invalidate(token).await;

        if updated {
            info!(token = %token, "Rewrote transport-encoded target to its decoded form");
        } else {
            debug!(token = %token, "Row disappeared before it could be rewritten");
        }
        Ok(())
    }
}

#[async_trait]
impl<S: LinkStore, C: LinkCache, K: Codec> Shortener for ShortenerService<S, C, K> {
    async fn shorten(&self, raw: &str) -> Result<ShortenOutcome> {
        let target = Target::parse(raw)?;
        let token = self.codec.derive(target.as_str());
        trace!(token = %token, "Derived token for target");

        let outcome = self
            .bounded(
                "create_if_absent",
                self.store.create_if_absent(&token, target.as_str()),
            )
            .await?;

        if outcome.created {
            debug!(token = %token, "Created link");
        } else if outcome.target == target.as_str() {
            trace!(token = %token, "Link already exists");
        } else if is_transport_form_of(&outcome.target, target.as_str()) {
            self.repair_legacy_row(&token, &target).await?;
        } else {
            warn!(token = %token, "Token already maps to a different target");
            return Err(ShortenerError::TokenCollision { token });
        }

        Ok(ShortenOutcome {
            created: outcome.created,
            token,
            canonical_target: target.into_string(),
        })
    }

    async fn resolve(&self, raw: &str) -> Result<String> {
        let token = Token::parse(raw)?;

        if let Some(target) = self.cache.get(&token).await {
            trace!(token = %token, "Resolved from cache");
            return Ok(target);
        }

        let stored = self
            .bounded("find_by_token", self.store.find_by_token(&token))
            .await?;

        let Some(stored) = stored else {
            debug!(token = %token, "No link for token");
            return Err(ShortenerError::NotFound(token.to_string()));
        };

        let target = Target::from_stored(&stored);
        self.cache.put(&token, &target).await;
        trace!(token = %token, "Resolved from store");
        Ok(target)
    }
}
