//! Role metadata validation

use thiserror::Error;

/// Errors that can occur while validating role metadata
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleValidationError {
    #[error("domain authority cannot be empty")]
    EmptyAuthority,

    #[error("domain authority must not include a scheme: '{0}'")]
    AuthorityWithScheme(String),

    #[error("domain authority must not include a path: '{0}'")]
    AuthorityWithPath(String),
}

/// Validate a bare domain authority (e.g. `example.com` or `example.com:8080`)
pub fn validate_domain_authority(authority: &str) -> Result<(), RoleValidationError> {
    if authority.is_empty() {
        return Err(RoleValidationError::EmptyAuthority);
    }

    if authority.contains("://") {
        return Err(RoleValidationError::AuthorityWithScheme(
            authority.to_string(),
        ));
    }

    if authority.contains('/') {
        return Err(RoleValidationError::AuthorityWithPath(authority.to_string()));
    }

    Ok(())
}
