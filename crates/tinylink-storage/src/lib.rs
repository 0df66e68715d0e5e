//! Durable [`LinkStore`](tinylink_core::LinkStore) backends.

pub mod memory;
pub mod mysql;
pub mod sqlite;

mod sql;

pub use memory::InMemoryLinkStore;
pub use mysql::MySqlLinkStore;
pub use sql::PoolConfig;
pub use sqlite::SqliteLinkStore;
