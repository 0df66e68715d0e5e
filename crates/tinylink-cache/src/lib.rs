//! In-memory implementations of the resolution cache.

pub mod lru;
pub mod moka;

pub use self::lru::{LruLinkCache, DEFAULT_CAPACITY};
pub use self::moka::{MokaCacheConfig, MokaLinkCache};
