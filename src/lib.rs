//! Shortlink authorization core
//!
//! The authorization subsystem of a URL-shortening service:
//! - API keys with optional name, expiration and a one-way enabled flag
//! - Role assignments carrying role-specific metadata (domain restriction,
//!   short URL restriction), unique per role kind
//! - Translation of a key's role set into an AND-composed query spec, in a
//!   standalone and an inlined variant, that the persistence layer applies
//!   when listing and counting short URLs
//!
//! HTTP routing and database plumbing are collaborators: they resolve the
//! caller's key, gate it through `is_valid`, and hand the built spec to a
//! query executor such as the in-memory repositories provided here.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    ApiKey, ApiKeyId, ApiKeyMeta, ApiKeyRepository, ApiKeyRole, Clock, DomainError, FixedClock,
    Role, RoleDefinition, RoleMeta, ShortUrl, ShortUrlIdentifier, ShortUrlRepository, Spec,
    SpecTarget, SpecValue, SystemClock,
};
pub use infrastructure::{
    ApiKeyService, InMemoryApiKeyRepository, InMemoryShortUrlRepository, ShortUrlService,
};
