//! API key roles
//!
//! Each role kind pairs a metadata shape with a rule for turning that
//! metadata into a query spec. Two spec variants exist per role: the
//! standalone form (optionally qualified by a context alias when the query
//! joins differently-aliased entities) and the inlined form, expressed
//! against the flat joined column names for embedding inside a larger
//! query expression.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::ApiKeyId;
use super::validation::{validate_domain_authority, RoleValidationError};
use crate::domain::short_url::ShortUrlIdentifier;
use crate::domain::spec::{Spec, SpecValue};
use crate::domain::DomainError;

/// Closed set of role kinds an API key can be assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Key is restricted to short URLs of one domain
    DomainRestricted,
    /// Key is restricted to one specific short URL
    ShortUrlRestricted,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainRestricted => "domain_restricted",
            Self::ShortUrlRestricted => "short_url_restricted",
        }
    }

    /// Build the standalone spec for one role assignment
    ///
    /// The optional `context` prefixes field paths, for queries where the
    /// short URL entity is joined under an alias.
    pub fn to_spec(assignment: &ApiKeyRole, context: Option<&str>) -> Spec {
        match assignment.meta() {
            RoleMeta::Domain { authority } => {
                Spec::eq(qualify(context, "domain.authority"), authority.as_str())
            }
            RoleMeta::ShortUrl { identifier } => Spec::and_all([
                Spec::eq(qualify(context, "short_code"), identifier.short_code()),
                Spec::eq(
                    qualify(context, "domain.authority"),
                    SpecValue::from(identifier.domain()),
                ),
            ]),
        }
    }

    /// Build the inlined spec for one role assignment
    pub fn to_inlined_spec(assignment: &ApiKeyRole) -> Spec {
        match assignment.meta() {
            RoleMeta::Domain { authority } => {
                Spec::eq("short_urls.domain_authority", authority.as_str())
            }
            RoleMeta::ShortUrl { identifier } => Spec::and_all([
                Spec::eq("short_urls.short_code", identifier.short_code()),
                Spec::eq(
                    "short_urls.domain_authority",
                    SpecValue::from(identifier.domain()),
                ),
            ]),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn qualify(context: Option<&str>, field: &str) -> String {
    match context {
        Some(alias) => format!("{alias}.{field}"),
        None => field.to_string(),
    }
}

/// Metadata payload attached to a role assignment
///
/// Each variant belongs to exactly one [`Role`] kind; [`RoleMeta::role`]
/// reports which.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMeta {
    /// Domain authority a [`Role::DomainRestricted`] key is limited to
    Domain { authority: String },
    /// Short URL a [`Role::ShortUrlRestricted`] key is limited to
    ShortUrl { identifier: ShortUrlIdentifier },
}

impl RoleMeta {
    /// The role kind this payload belongs to
    pub fn role(&self) -> Role {
        match self {
            Self::Domain { .. } => Role::DomainRestricted,
            Self::ShortUrl { .. } => Role::ShortUrlRestricted,
        }
    }
}

/// A role kind paired with a matching metadata payload
///
/// The constructors are the only way to build one, so a definition can
/// never carry metadata belonging to a different role kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
    role: Role,
    meta: RoleMeta,
}

impl RoleDefinition {
    /// Define a domain restriction
    pub fn domain_restricted(authority: impl Into<String>) -> Result<Self, RoleValidationError> {
        let authority = authority.into();
        validate_domain_authority(&authority)?;

        Ok(Self {
            role: Role::DomainRestricted,
            meta: RoleMeta::Domain { authority },
        })
    }

    /// Define a short URL restriction
    pub fn short_url_restricted(identifier: ShortUrlIdentifier) -> Self {
        Self {
            role: Role::ShortUrlRestricted,
            meta: RoleMeta::ShortUrl { identifier },
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn meta(&self) -> &RoleMeta {
        &self.meta
    }

    pub(crate) fn into_meta(self) -> RoleMeta {
        self.meta
    }
}

/// Assignment of one role (plus metadata) to one API key
///
/// Identity for lookup purposes is (owning key, role kind); the metadata is
/// mutable state. The back-reference to the owning key is a plain id, not
/// an ownership edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyRole {
    api_key: ApiKeyId,
    role: Role,
    meta: RoleMeta,
}

impl ApiKeyRole {
    pub(crate) fn new(api_key: ApiKeyId, definition: RoleDefinition) -> Self {
        Self {
            api_key,
            role: definition.role,
            meta: definition.meta,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn meta(&self) -> &RoleMeta {
        &self.meta
    }

    /// Id of the key this assignment belongs to
    pub fn api_key(&self) -> &ApiKeyId {
        &self.api_key
    }

    /// Replace the metadata payload wholesale
    ///
    /// A payload belonging to a different role kind is a programmer error
    /// and is rejected, leaving the previous metadata in place.
    pub fn update_meta(&mut self, meta: RoleMeta) -> Result<(), DomainError> {
        if meta.role() != self.role {
            return Err(DomainError::validation(format!(
                "metadata for role '{}' cannot be assigned to role '{}'",
                meta.role(),
                self.role,
            )));
        }

        self.meta = meta;
        Ok(())
    }

    // Shape already guaranteed by RoleDefinition construction.
    pub(crate) fn replace_meta(&mut self, meta: RoleMeta) {
        debug_assert_eq!(meta.role(), self.role);
        self.meta = meta;
    }
}
