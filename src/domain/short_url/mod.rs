//! Short URL domain - identifiers and the record predicates range over

mod entity;
mod identifier;
mod repository;

pub use entity::ShortUrl;
pub use identifier::ShortUrlIdentifier;
pub use repository::ShortUrlRepository;
