//! In-memory short URL repository implementation
//!
//! Evaluates query specs directly against stored records; a database-backed
//! implementation would translate the same specs into SQL instead.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::short_url::{ShortUrl, ShortUrlIdentifier, ShortUrlRepository};
use crate::domain::spec::Spec;
use crate::domain::DomainError;

/// In-memory implementation of ShortUrlRepository
#[derive(Debug, Default)]
pub struct InMemoryShortUrlRepository {
    urls: Arc<RwLock<HashMap<ShortUrlIdentifier, ShortUrl>>>,
}

impl InMemoryShortUrlRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShortUrlRepository for InMemoryShortUrlRepository {
    async fn save(&self, short_url: ShortUrl) -> Result<ShortUrl, DomainError> {
        let mut urls = self.urls.write().await;
        let identifier = short_url.identifier().clone();

        if urls.contains_key(&identifier) {
            return Err(DomainError::conflict(format!(
                "short URL '{identifier}' already exists"
            )));
        }

        urls.insert(identifier, short_url.clone());
        Ok(short_url)
    }

    async fn find_matching(&self, spec: &Spec) -> Result<Vec<ShortUrl>, DomainError> {
        let urls = self.urls.read().await;
        let mut matching: Vec<ShortUrl> = urls
            .values()
            .filter(|url| spec.matches(*url))
            .cloned()
            .collect();

        // HashMap iteration order is arbitrary; give callers a stable one.
        matching.sort_by(|a, b| a.identifier().to_string().cmp(&b.identifier().to_string()));
        Ok(matching)
    }

    async fn count_matching(&self, spec: &Spec) -> Result<usize, DomainError> {
        let urls = self.urls.read().await;
        Ok(urls.values().filter(|url| spec.matches(*url)).count())
    }

    async fn find_by_identifier(
        &self,
        identifier: &ShortUrlIdentifier,
        spec: &Spec,
    ) -> Result<Option<ShortUrl>, DomainError> {
        let urls = self.urls.read().await;
        Ok(urls
            .get(identifier)
            .filter(|url| spec.matches(*url))
            .cloned())
    }
}
