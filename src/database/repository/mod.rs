//! Repository module - data access layer over the MongoDB collections.

mod connection_repository;
mod filter_repository;
mod request_repository;

pub use connection_repository::ConnectionRepository;
pub use filter_repository::FilterRepository;
pub use request_repository::RequestRepository;
