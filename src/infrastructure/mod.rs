//! Infrastructure layer - storage implementations and services

pub mod api_key;
pub mod logging;
pub mod short_url;

pub use api_key::{ApiKeyService, InMemoryApiKeyRepository};
pub use logging::init_logging;
pub use short_url::{InMemoryShortUrlRepository, ShortUrlService};
