use crate::error::Result;
use crate::token::Token;
use async_trait::async_trait;
use serde::Serialize;

/// Result of a shorten call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenOutcome {
    /// Whether this call created the link.
    pub created: bool,
    /// The token that now resolves to `canonical_target`.
    pub token: Token,
    /// The decoded target the token resolves to.
    pub canonical_target: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates the link for a decoded target URL, or returns the existing one.
    async fn shorten(&self, target: &str) -> Result<ShortenOutcome>;

    /// Resolves a token to its target URL.
    ///
    /// Fails with `NotFound` if no link exists and `MalformedInput` if the
    /// token cannot be a valid token.
    async fn resolve(&self, token: &str) -> Result<String>;
}
