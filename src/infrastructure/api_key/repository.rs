//! In-memory API key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: Arc<RwLock<HashMap<ApiKeyId, ApiKey>>>,
}

impl InMemoryApiKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(id).cloned())
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        let id = api_key.id().clone();

        if keys.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "API key '{id}' already exists"
            )));
        }

        keys.insert(id, api_key.clone());
        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        let id = api_key.id().clone();

        if !keys.contains_key(&id) {
            return Err(DomainError::not_found(format!("API key '{id}' not found")));
        }

        keys.insert(id, api_key.clone());
        Ok(api_key.clone())
    }

    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryApiKeyRepository::new();
        let key = ApiKey::create();

        repo.create(key.clone()).await.unwrap();

        let retrieved = repo.get(key.id()).await.unwrap();
        assert_eq!(retrieved, Some(key));
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let repo = InMemoryApiKeyRepository::new();
        let key = ApiKey::create();

        repo.create(key.clone()).await.unwrap();
        let result = repo.create(key).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_writes_back_mutations() {
        let repo = InMemoryApiKeyRepository::new();
        let mut key = ApiKey::create();
        repo.create(key.clone()).await.unwrap();

        key.disable();
        repo.update(&key).await.unwrap();

        let retrieved = repo.get(key.id()).await.unwrap().unwrap();
        assert!(!retrieved.is_enabled());
    }

    #[tokio::test]
    async fn test_update_missing_key_is_not_found() {
        let repo = InMemoryApiKeyRepository::new();
        let key = ApiKey::create();

        let result = repo.update(&key).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_and_exists() {
        let repo = InMemoryApiKeyRepository::new();
        let key = ApiKey::create();

        assert!(!repo.exists(key.id()).await.unwrap());

        repo.create(key.clone()).await.unwrap();
        repo.create(ApiKey::create()).await.unwrap();

        assert!(repo.exists(key.id()).await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }
}
