//! Link shortening and resolution.
//!
//! [`ShortenerService`] ties a [`Codec`](tinylink_codec::Codec), a
//! [`LinkStore`](tinylink_core::LinkStore) and a
//! [`LinkCache`](tinylink_core::LinkCache) together behind the
//! [`Shortener`](tinylink_core::Shortener) trait.

pub mod config;
pub mod service;

pub use config::ServiceConfig;
pub use service::ShortenerService;
