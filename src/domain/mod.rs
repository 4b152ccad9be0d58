//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod clock;
pub mod error;
pub mod short_url;
pub mod spec;

pub use api_key::{
    ApiKey, ApiKeyId, ApiKeyMeta, ApiKeyRepository, ApiKeyRole, Role, RoleDefinition, RoleMeta,
    RoleValidationError,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use short_url::{ShortUrl, ShortUrlIdentifier, ShortUrlRepository};
pub use spec::{Spec, SpecCondition, SpecOperator, SpecTarget, SpecValue};
