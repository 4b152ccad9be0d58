//! Short URL repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::ShortUrl;
use super::identifier::ShortUrlIdentifier;
use crate::domain::spec::Spec;
use crate::domain::DomainError;

/// Repository trait for short URL storage
///
/// Listing and counting take a [`Spec`] so callers can hand in the filter
/// built from an API key's roles; the repository is the query-execution
/// side of that contract.
#[async_trait]
pub trait ShortUrlRepository: Send + Sync + Debug {
    /// Persist a short URL
    async fn save(&self, short_url: ShortUrl) -> Result<ShortUrl, DomainError>;

    /// Find all short URLs matching the given spec
    async fn find_matching(&self, spec: &Spec) -> Result<Vec<ShortUrl>, DomainError>;

    /// Count short URLs matching the given spec
    async fn count_matching(&self, spec: &Spec) -> Result<usize, DomainError>;

    /// Resolve one short URL by identifier, restricted by the given spec
    ///
    /// Returns `None` both when the identifier is unknown and when the spec
    /// filters the record out, so callers cannot distinguish "does not
    /// exist" from "not yours".
    async fn find_by_identifier(
        &self,
        identifier: &ShortUrlIdentifier,
        spec: &Spec,
    ) -> Result<Option<ShortUrl>, DomainError>;
}
