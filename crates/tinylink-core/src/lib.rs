//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the types shared by the codec, cache, storage and
//! shortener crates, plus the traits that tie them together.

pub mod cache;
pub mod error;
pub mod shortener;
pub mod store;
pub mod target;
pub mod token;

pub use cache::LinkCache;
pub use error::{ShortenerError, StorageError};
pub use shortener::{ShortenOutcome, Shortener};
pub use store::{CreateOutcome, LinkRecord, LinkStore};
pub use target::Target;
pub use token::{Token, TOKEN_LEN};
