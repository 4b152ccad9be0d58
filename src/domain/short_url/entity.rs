//! Short URL entity
//!
//! Deliberately small: just enough for authorization predicates to range
//! over. Redirection, visit tracking and code generation live elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifier::ShortUrlIdentifier;
use crate::domain::api_key::ApiKeyId;
use crate::domain::spec::{SpecTarget, SpecValue};

/// A persisted short URL record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortUrl {
    identifier: ShortUrlIdentifier,
    long_url: String,
    /// Key that created this short URL, if it was created through the API
    #[serde(skip_serializing_if = "Option::is_none")]
    author_api_key: Option<ApiKeyId>,
    date_created: DateTime<Utc>,
}

impl ShortUrl {
    pub fn new(identifier: ShortUrlIdentifier, long_url: impl Into<String>) -> Self {
        Self {
            identifier,
            long_url: long_url.into(),
            author_api_key: None,
            date_created: Utc::now(),
        }
    }

    /// Set the authoring API key
    pub fn with_author(mut self, author: ApiKeyId) -> Self {
        self.author_api_key = Some(author);
        self
    }

    /// Set an explicit creation timestamp
    pub fn with_date_created(mut self, date_created: DateTime<Utc>) -> Self {
        self.date_created = date_created;
        self
    }

    pub fn identifier(&self) -> &ShortUrlIdentifier {
        &self.identifier
    }

    pub fn short_code(&self) -> &str {
        self.identifier.short_code()
    }

    pub fn domain(&self) -> Option<&str> {
        self.identifier.domain()
    }

    pub fn long_url(&self) -> &str {
        &self.long_url
    }

    pub fn author_api_key(&self) -> Option<&ApiKeyId> {
        self.author_api_key.as_ref()
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }
}

impl SpecTarget for ShortUrl {
    fn field(&self, path: &str) -> Option<SpecValue> {
        match path {
            "short_code" => Some(self.short_code().into()),
            "domain.authority" => self.domain().map(Into::into),
            "author_api_key" => self
                .author_api_key()
                .map(|key| key.as_str().into()),
            "long_url" => Some(self.long_url().into()),
            _ => None,
        }
    }
}
