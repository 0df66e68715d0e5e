use crate::cli::{CachePolicyArg, StorageBackendArg, CLI};
use anyhow::Context;
use std::sync::Arc;
use tinylink_cache::{LruLinkCache, MokaLinkCache};
use tinylink_codec::Sha512Codec;
use tinylink_core::{LinkStore, Shortener};
use tinylink_shortener::{ServiceConfig, ShortenerService};
use tinylink_storage::{InMemoryLinkStore, MySqlLinkStore, PoolConfig, SqliteLinkStore};
use tracing::info;

/// Opens the configured store and wires it into a shortener.
pub async fn build_shortener(config: &CLI) -> anyhow::Result<Arc<dyn Shortener>> {
    let pool = PoolConfig::builder()
        .acquire_timeout(config.store_timeout())
        .build();

    match config.storage {
        StorageBackendArg::InMemory => Ok(assemble(InMemoryLinkStore::new(), config)),
        StorageBackendArg::Sqlite => {
            let url = config
                .database_url()
                .context("database url is required when storage backend is sqlite")?;
            let store = SqliteLinkStore::connect(url, &pool)
                .await
                .context("failed to open sqlite link store")?;
            Ok(assemble(store, config))
        }
        StorageBackendArg::Mysql => {
            let url = config
                .database_url()
                .context("database url is required when storage backend is mysql")?;
            let store = MySqlLinkStore::connect(url, &pool)
                .await
                .context("failed to connect to mysql")?;
            store
                .migrate()
                .await
                .context("failed to apply mysql schema")?;
            Ok(assemble(store, config))
        }
    }
}

fn assemble<S: LinkStore>(store: S, config: &CLI) -> Arc<dyn Shortener> {
    let service_config = ServiceConfig::builder()
        .store_timeout(config.store_timeout())
        .build();

    info!(
        storage_backend = %config.storage,
        cache_policy = %config.cache_policy,
        cache_capacity = config.cache_capacity.get(),
        "assembled shortener"
    );

    match config.cache_policy {
        CachePolicyArg::Lru => Arc::new(
            ShortenerService::new(
                store,
                LruLinkCache::new(config.cache_capacity),
                Sha512Codec::new(),
            )
            .with_config(service_config),
        ),
        CachePolicyArg::TinyLfu => Arc::new(
            ShortenerService::new(
                store,
                MokaLinkCache::with_capacity(config.cache_capacity.get() as u64),
                Sha512Codec::new(),
            )
            .with_config(service_config),
        ),
    }
}
