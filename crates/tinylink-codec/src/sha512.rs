use crate::Codec;
use sha2::{Digest, Sha512};
use tinylink_core::{Token, TOKEN_LEN};

/// Derives tokens from the SHA-512 digest of the target.
///
/// The 512-bit digest is base58-encoded and the last [`TOKEN_LEN`]
/// characters are kept, i.e. the token is `digest mod 58^12` written in
/// base58. The low-order digits are close to uniform, unlike the leading
/// digit of the full encoding.
///
/// # Collisions
///
/// Truncation shrinks the token space to `58^12` (about `1.45e21`, a
/// little over 70 bits). The birthday bound puts the chance of any collision
/// among `n` links at roughly `n^2 / (2 * 58^12)`: about `3.5e-10` for a
/// million links and `3.5e-6` for a hundred million. See
/// [`Sha512Codec::collision_probability`]. A collision is detected by the
/// store's unique constraint and reported as
/// [`ShortenerError::TokenCollision`](tinylink_core::ShortenerError::TokenCollision);
/// it never overwrites the other link.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Codec;

impl Sha512Codec {
    pub fn new() -> Self {
        Self
    }

    /// Number of distinct tokens the codec can produce.
    pub fn token_space() -> f64 {
        58_f64.powi(TOKEN_LEN as i32)
    }

    /// Probability that at least two of `links` distinct targets share a token.
    pub fn collision_probability(links: u64) -> f64 {
        let n = links as f64;
        let exponent = -(n * (n - 1.0)) / (2.0 * Self::token_space());
        -exponent.exp_m1()
    }
}

impl Codec for Sha512Codec {
    fn derive(&self, target: &str) -> Token {
        let digest = Sha512::digest(target.as_bytes());
        let encoded = bs58::encode(digest).into_string();

        let token = if encoded.len() >= TOKEN_LEN {
            encoded[encoded.len() - TOKEN_LEN..].to_owned()
        } else {
            // '1' is the base58 zero digit
            format!("{:1>width$}", encoded, width = TOKEN_LEN)
        };

        Token::new_unchecked(token)
    }
}
