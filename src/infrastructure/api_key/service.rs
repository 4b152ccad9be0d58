//! API Key service
//!
//! High-level operations for API key management and the authorization gate
//! collaborators go through before any query filter is built.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyMeta, ApiKeyRepository, RoleDefinition};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::DomainError;

/// API Key service for managing and checking API keys
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new API key service using the system clock
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create with a custom clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create and persist a bare admin key
    pub async fn create_key(&self) -> Result<ApiKey, DomainError> {
        let api_key = ApiKey::create();
        info!("Creating admin API key: id={}", api_key.id());

        self.repository.create(api_key).await
    }

    /// Create and persist a key from a creation payload
    pub async fn create_with_meta(&self, meta: ApiKeyMeta) -> Result<ApiKey, DomainError> {
        let api_key = ApiKey::from_meta(meta);
        info!(
            "Creating API key: id={}, name={:?}, roles={}",
            api_key.id(),
            api_key.name(),
            api_key.map_roles(|role, _| role.to_string()).join(","),
        );

        self.repository.create(api_key).await
    }

    /// Get an API key by id
    pub async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.repository.get(id).await
    }

    /// List all API keys
    pub async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list().await
    }

    /// Disable a key; disabling an already-disabled key is a no-op
    pub async fn disable_key(&self, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        let mut api_key = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{id}' not found")))?;

        api_key.disable();
        info!("Disabled API key: id={}", id);

        self.repository.update(&api_key).await
    }

    /// Register a role on a key, replacing the metadata if already assigned
    pub async fn register_role(
        &self,
        id: &ApiKeyId,
        definition: RoleDefinition,
    ) -> Result<ApiKey, DomainError> {
        let mut api_key = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{id}' not found")))?;

        debug!("Registering role '{}' on API key {}", definition.role(), id);
        api_key.register_role(definition);

        self.repository.update(&api_key).await
    }

    /// Resolve a presented key and enforce validity
    ///
    /// This is the authorization gate: expired or disabled keys are
    /// rejected here, and only here. The returned key is what callers build
    /// query specs from.
    pub async fn check_key(&self, key: &str) -> Result<ApiKey, DomainError> {
        let id = ApiKeyId::new(key);
        let api_key = self
            .repository
            .get(&id)
            .await?
            .ok_or_else(|| DomainError::not_found("API key not found"))?;

        if !api_key.is_valid(self.clock.as_ref()) {
            warn!("Rejected invalid API key: id={}", id);
            return Err(DomainError::forbidden("API key is disabled or expired"));
        }

        debug!("Accepted API key: id={}, admin={}", id, api_key.is_admin());
        Ok(api_key)
    }
}
