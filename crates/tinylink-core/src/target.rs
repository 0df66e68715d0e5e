//! Canonical representation of link targets.
//!
//! A target travels over the shorten wire base64-wrapped (the transport
//! form) and is decoded once at the boundary. Everything behind the boundary
//! (codec, store, cache) only ever sees the decoded URL string.

use crate::error::ShortenerError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use url::Url;

/// A validated, decoded destination URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target(String);

impl Target {
    /// Validates a decoded target.
    ///
    /// The string is kept byte-for-byte; it is only parsed to check that it
    /// is an absolute `http`/`https` URL with a host.
    pub fn parse(raw: &str) -> std::result::Result<Self, ShortenerError> {
        if raw.trim().is_empty() {
            return Err(ShortenerError::MalformedInput(
                "target URL cannot be empty".to_string(),
            ));
        }

        if raw.trim() != raw {
            return Err(ShortenerError::MalformedInput(
                "target URL has leading or trailing whitespace".to_string(),
            ));
        }

        let url = Url::parse(raw)
            .map_err(|e| ShortenerError::MalformedInput(format!("unparseable target URL: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ShortenerError::MalformedInput(format!(
                    "target URL scheme must be http or https, got '{}'",
                    other
                )))
            }
        }

        if url.host().is_none() {
            return Err(ShortenerError::MalformedInput(
                "target URL has no host".to_string(),
            ));
        }

        Ok(Self(raw.to_owned()))
    }

    /// Decodes a transport-form (base64) target and validates the result.
    pub fn from_transport(encoded: &str) -> std::result::Result<Self, ShortenerError> {
        let decoded = decode_transport(encoded).ok_or_else(|| {
            ShortenerError::MalformedInput("target is not valid base64-encoded UTF-8".to_string())
        })?;
        Self::parse(&decoded)
    }

    /// Normalises a value read back from the store.
    ///
    /// Rows written before the decode-on-ingress convention may hold the
    /// transport form. Such values are returned decoded; everything else is
    /// returned as stored.
    pub fn from_stored(stored: &str) -> String {
        if Self::parse(stored).is_ok() {
            return stored.to_owned();
        }

        match decode_transport(stored) {
            Some(decoded) if Self::parse(&decoded).is_ok() => decoded,
            _ => stored.to_owned(),
        }
    }

    /// Returns the target as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the target and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wraps a decoded target in its transport form.
pub fn encode_transport(target: &str) -> String {
    STANDARD.encode(target.as_bytes())
}

/// Unwraps a transport-form value. Returns `None` when the input is not
/// padded standard base64 or does not decode to UTF-8.
pub fn decode_transport(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Whether `stored` is the transport form of `target`.
pub fn is_transport_form_of(stored: &str, target: &str) -> bool {
    decode_transport(stored).is_some_and(|decoded| decoded == target)
}
