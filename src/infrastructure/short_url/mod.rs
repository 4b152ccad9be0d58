//! Short URL infrastructure - spec-executing storage and listing service

mod repository;
mod service;

pub use repository::InMemoryShortUrlRepository;
pub use service::ShortUrlService;
