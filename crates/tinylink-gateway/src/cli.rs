use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "TINYLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "TINYLINK_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE";
pub const DATABASE_URL_ENV: &str = "TINYLINK_DATABASE_URL";
pub const CACHE_CAPACITY_ENV: &str = "TINYLINK_CACHE_CAPACITY";
pub const CACHE_POLICY_ENV: &str = "TINYLINK_CACHE_POLICY";
pub const STORE_TIMEOUT_MS_ENV: &str = "TINYLINK_STORE_TIMEOUT_MS";
pub const LOG_JSON_ENV: &str = "TINYLINK_LOG_JSON";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SQLITE_URL: &str = "sqlite:.shortlink.db?mode=rwc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CachePolicyArg {
    /// Exact least-recently-used eviction.
    #[value(name = "lru")]
    Lru,
    /// Moka's TinyLFU admission with approximate capacity.
    #[value(name = "tiny-lfu")]
    TinyLfu,
}

impl Display for CachePolicyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CachePolicyArg::Lru => write!(f, "lru"),
            CachePolicyArg::TinyLfu => write!(f, "tiny-lfu"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinylink", about = "Deterministic URL shortener")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of the short URLs handed back to callers.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    /// Defaults to `.shortlink.db` in the working directory for sqlite.
    #[arg(long, env = DATABASE_URL_ENV, required_if_eq("storage", "mysql"))]
    pub database_url: Option<String>,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value = "8192")]
    pub cache_capacity: NonZeroUsize,

    #[arg(
        long,
        env = CACHE_POLICY_ENV,
        value_enum,
        default_value_t = CachePolicyArg::Lru
    )]
    pub cache_policy: CachePolicyArg,

    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = 3000)]
    pub store_timeout_ms: u64,

    /// Emit logs as JSON lines.
    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}

impl CLI {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// The database URL to use for SQL backends.
    pub fn database_url(&self) -> Option<&str> {
        match (self.storage, self.database_url.as_deref()) {
            (_, Some(url)) => Some(url),
            (StorageBackendArg::Sqlite, None) => Some(DEFAULT_SQLITE_URL),
            _ => None,
        }
    }
}
