use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Tunables for [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceConfig {
    /// Upper bound on any single store call.
    #[builder(default = DEFAULT_STORE_TIMEOUT)]
    pub store_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
