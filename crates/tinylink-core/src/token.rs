use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Number of characters in every token.
pub const TOKEN_LEN: usize = 12;

/// The Bitcoin base58 alphabet. Tokens only ever contain these characters.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A validated short token for a link.
///
/// Tokens are exactly [`TOKEN_LEN`] base58 characters and compare
/// case-sensitively.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Parses a token received from a caller.
    ///
    /// Fails with [`ShortenerError::MalformedInput`] when the length is not
    /// [`TOKEN_LEN`] or a character falls outside the base58 alphabet.
    pub fn parse(raw: &str) -> std::result::Result<Self, ShortenerError> {
        Self::validate(raw)?;
        Ok(Self(raw.to_owned()))
    }

    /// Creates a `Token` without validation.
    ///
    /// Use this only for tokens produced by trusted internal sources
    /// (e.g. a codec that is guaranteed to produce valid output).
    pub fn new_unchecked(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generates the full short URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(raw: &str) -> std::result::Result<(), ShortenerError> {
        if raw.len() != TOKEN_LEN {
            return Err(ShortenerError::MalformedInput(format!(
                "token length must be {}, got {}",
                TOKEN_LEN,
                raw.len()
            )));
        }

        if let Some(c) = raw.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
            return Err(ShortenerError::MalformedInput(format!(
                "token contains non-base58 character '{}'",
                c
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&self.0).finish()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Token {
    type Err = ShortenerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Token::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_tokens() {
        assert!(Token::parse("unknown1234x").is_ok());
        assert!(Token::parse("111111111111").is_ok());
        assert!(Token::parse("zzzzzzzzzzzz").is_ok());
    }

    #[test]
    fn wrong_length() {
        assert!(Token::parse("").is_err());
        assert!(Token::parse("abc").is_err());
        assert!(Token::parse("abcdefghijk").is_err());
        assert!(Token::parse("abcdefghijkmn").is_err());
    }

    #[test]
    fn ambiguous_characters_are_rejected() {
        // 0, O, I and l are not part of base58
        for bad in ["0bcdefghijkm", "Obcdefghijkm", "Ibcdefghijkm", "lbcdefghijkm"] {
            let err = Token::parse(bad).unwrap_err();
            assert!(matches!(err, ShortenerError::MalformedInput(_)), "{bad}");
        }
    }

    #[test]
    fn multibyte_input_is_rejected_by_length() {
        // 12 chars but more than 12 bytes
        assert!(Token::parse("ééééééééééé1").is_err());
    }

    #[test]
    fn from_str_matches_parse() {
        let token: Token = "unknown1234x".parse().unwrap();
        assert_eq!(token.as_str(), "unknown1234x");
        assert!("nope".parse::<Token>().is_err());
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let token = Token::parse("abc123defghi").unwrap();
        assert_eq!(token.to_url("https://t.ly"), "https://t.ly/abc123defghi");
        assert_eq!(token.to_url("https://t.ly/"), "https://t.ly/abc123defghi");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Token = serde_json::from_str("\"unknown1234x\"").unwrap();
        assert_eq!(ok.to_string(), "unknown1234x");
        assert!(serde_json::from_str::<Token>("\"short\"").is_err());
    }
}
