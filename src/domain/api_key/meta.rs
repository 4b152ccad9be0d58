//! API key creation payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::RoleDefinition;

/// Everything needed to create a non-trivial API key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyMeta {
    /// Human-readable name for the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the key stops being valid (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Roles to register on the key at creation time
    #[serde(default)]
    pub role_definitions: Vec<RoleDefinition>,
}

impl ApiKeyMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the expiration date
    pub fn with_expiration_date(mut self, expiration_date: DateTime<Utc>) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    /// Add one role definition
    pub fn with_role(mut self, definition: RoleDefinition) -> Self {
        self.role_definitions.push(definition);
        self
    }

    /// Replace the full list of role definitions
    pub fn with_role_definitions(mut self, definitions: Vec<RoleDefinition>) -> Self {
        self.role_definitions = definitions;
        self
    }
}
