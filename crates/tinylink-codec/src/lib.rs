pub mod sha512;

pub use sha512::Sha512Codec;

use tinylink_core::Token;

/// Trait for deriving tokens from targets.
///
/// Implementations are pure functions that don't interact with storage:
/// the same target must always yield the same token, across calls and
/// across process restarts.
pub trait Codec: Send + Sync + 'static {
    /// Derives the token for a decoded target URL.
    fn derive(&self, target: &str) -> Token;
}
