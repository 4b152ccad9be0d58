//! API Key domain
//!
//! API keys, their role assignments, and the translation of a key's role
//! set into a composite query spec.

mod entity;
mod meta;
mod repository;
mod role;
mod validation;

pub use entity::{ApiKey, ApiKeyId};
pub use meta::ApiKeyMeta;
pub use repository::ApiKeyRepository;
pub use role::{ApiKeyRole, Role, RoleDefinition, RoleMeta};
pub use validation::{validate_domain_authority, RoleValidationError};
