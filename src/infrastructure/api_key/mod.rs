//! API key infrastructure - storage and management service

mod repository;
mod service;

pub use repository::InMemoryApiKeyRepository;
pub use service::ApiKeyService;
