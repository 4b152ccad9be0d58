//! Short URL identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a short URL by short code plus optional domain authority
///
/// A `None` domain means the short URL lives on the instance's default
/// domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortUrlIdentifier {
    short_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
}

impl ShortUrlIdentifier {
    /// Create an identifier with an explicit domain authority
    pub fn new(short_code: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            short_code: short_code.into(),
            domain,
        }
    }

    /// Create an identifier on the default domain
    pub fn from_short_code(short_code: impl Into<String>) -> Self {
        Self::new(short_code, None)
    }

    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

impl fmt::Display for ShortUrlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Some(domain) => write!(f, "{}/{}", domain, self.short_code),
            None => write!(f, "{}", self.short_code),
        }
    }
}
