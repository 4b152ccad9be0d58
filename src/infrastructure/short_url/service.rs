//! Short URL listing service
//!
//! Applies the query spec built from a caller's API key, so every listing,
//! counting and lookup operation only sees what the key's roles allow.

use std::sync::Arc;

use tracing::debug;

use crate::domain::api_key::ApiKey;
use crate::domain::short_url::{ShortUrl, ShortUrlIdentifier, ShortUrlRepository};
use crate::domain::DomainError;

/// Short URL service scoped by API key roles
///
/// Callers are expected to have run the key through the authorization gate
/// (`ApiKeyService::check_key`) first; this service only applies the key's
/// role filter.
#[derive(Debug)]
pub struct ShortUrlService<R>
where
    R: ShortUrlRepository,
{
    repository: Arc<R>,
    default_domain: Option<String>,
}

impl<R: ShortUrlRepository> ShortUrlService<R> {
    /// Create a new short URL service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            default_domain: None,
        }
    }

    /// Set the instance's default domain authority
    ///
    /// Identifiers naming the default domain explicitly are stored and
    /// looked up in their canonical form, with no domain.
    pub fn with_default_domain(mut self, default_domain: impl Into<String>) -> Self {
        self.default_domain = Some(default_domain.into());
        self
    }

    fn canonicalize(&self, identifier: ShortUrlIdentifier) -> ShortUrlIdentifier {
        match &self.default_domain {
            Some(default) if identifier.domain() == Some(default.as_str()) => {
                ShortUrlIdentifier::from_short_code(identifier.short_code())
            }
            _ => identifier,
        }
    }

    /// Persist a short URL, recording the creating key as its author
    pub async fn create(
        &self,
        identifier: ShortUrlIdentifier,
        long_url: impl Into<String> + Send,
        author: &ApiKey,
    ) -> Result<ShortUrl, DomainError> {
        let identifier = self.canonicalize(identifier);
        let short_url = ShortUrl::new(identifier, long_url).with_author(author.id().clone());
        self.repository.save(short_url).await
    }

    /// List the short URLs the given key is allowed to see
    pub async fn list_for_key(&self, api_key: &ApiKey) -> Result<Vec<ShortUrl>, DomainError> {
        let spec = api_key.spec(None);
        debug!("Listing short URLs for key {}: filter [{}]", api_key, spec);

        self.repository.find_matching(&spec).await
    }

    /// Count the short URLs the given key is allowed to see
    pub async fn count_for_key(&self, api_key: &ApiKey) -> Result<usize, DomainError> {
        self.repository.count_matching(&api_key.spec(None)).await
    }

    /// Resolve one short URL, restricted to what the given key may see
    ///
    /// Returns `None` for identifiers outside the key's scope, same as for
    /// identifiers that do not exist.
    pub async fn resolve_for_key(
        &self,
        identifier: &ShortUrlIdentifier,
        api_key: &ApiKey,
    ) -> Result<Option<ShortUrl>, DomainError> {
        let identifier = self.canonicalize(identifier.clone());
        self.repository
            .find_by_identifier(&identifier, &api_key.spec(None))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::{ApiKeyMeta, RoleDefinition};
    use crate::infrastructure::short_url::InMemoryShortUrlRepository;

    async fn seeded_service() -> ShortUrlService<InMemoryShortUrlRepository> {
        let service = ShortUrlService::new(Arc::new(InMemoryShortUrlRepository::new()));
        let admin = ApiKey::create();

        for (code, domain) in [
            ("abc123", Some("example.com")),
            ("def456", Some("example.com")),
            ("ghi789", Some("other.com")),
            ("jkl012", None),
        ] {
            service
                .create(
                    ShortUrlIdentifier::new(code, domain.map(String::from)),
                    "https://example.org/landing",
                    &admin,
                )
                .await
                .unwrap();
        }

        service
    }

    fn domain_key(authority: &str) -> ApiKey {
        ApiKey::from_meta(
            ApiKeyMeta::new().with_role(RoleDefinition::domain_restricted(authority).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_admin_key_sees_everything() {
        let service = seeded_service().await;
        let admin = ApiKey::create();

        assert_eq!(service.list_for_key(&admin).await.unwrap().len(), 4);
        assert_eq!(service.count_for_key(&admin).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_domain_restricted_key_sees_only_its_domain() {
        let service = seeded_service().await;
        let key = domain_key("example.com");

        let urls = service.list_for_key(&key).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|url| url.domain() == Some("example.com")));
        assert_eq!(service.count_for_key(&key).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_short_url_restricted_key_sees_one_record() {
        let service = seeded_service().await;
        let identifier = ShortUrlIdentifier::new("abc123", Some("example.com".to_string()));
        let key = ApiKey::from_meta(
            ApiKeyMeta::new()
                .with_role(RoleDefinition::short_url_restricted(identifier.clone())),
        );

        let urls = service.list_for_key(&key).await.unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].identifier(), &identifier);
    }

    #[tokio::test]
    async fn test_end_to_end_authorization_flow() {
        use crate::infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository};

        let keys = ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()));
        let urls = seeded_service().await;

        let restricted = keys
            .create_with_meta(
                ApiKeyMeta::new()
                    .with_name("svc")
                    .with_role(RoleDefinition::domain_restricted("example.com").unwrap()),
            )
            .await
            .unwrap();

        // The HTTP layer's flow: resolve and gate the key, then list
        // through the filter built from its roles.
        let checked = keys.check_key(restricted.id().as_str()).await.unwrap();
        assert!(!checked.is_admin());

        let visible = urls.list_for_key(&checked).await.unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|url| url.domain() == Some("example.com")));

        // Once disabled, the gate rejects the key before any filter is built.
        keys.disable_key(restricted.id()).await.unwrap();
        assert!(keys.check_key(restricted.id().as_str()).await.is_err());
    }

    #[tokio::test]
    async fn test_default_domain_identifiers_are_canonicalized() {
        let service = ShortUrlService::new(Arc::new(InMemoryShortUrlRepository::new()))
            .with_default_domain("s.example.com");
        let admin = ApiKey::create();

        let explicit = ShortUrlIdentifier::new("abc123", Some("s.example.com".to_string()));
        let created = service
            .create(explicit.clone(), "https://example.org/landing", &admin)
            .await
            .unwrap();

        // Stored without the domain, resolvable under both spellings.
        assert!(created.domain().is_none());
        assert!(service.resolve_for_key(&explicit, &admin).await.unwrap().is_some());
        let canonical = ShortUrlIdentifier::from_short_code("abc123");
        assert!(service.resolve_for_key(&canonical, &admin).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_resolve_outside_scope_is_none() {
        let service = seeded_service().await;
        let key = domain_key("example.com");
        let foreign = ShortUrlIdentifier::new("ghi789", Some("other.com".to_string()));

        assert!(service.resolve_for_key(&foreign, &key).await.unwrap().is_none());

        let admin = ApiKey::create();
        assert!(service.resolve_for_key(&foreign, &admin).await.unwrap().is_some());
    }
}
