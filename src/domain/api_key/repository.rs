//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::DomainError;

/// Repository trait for API key storage
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its id
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Persist a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Write back a mutated API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// List all API keys
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError>;

    /// Check if an API key id exists
    async fn exists(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}
