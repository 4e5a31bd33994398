//! Database module exports.

pub mod models;
mod mongo;
pub mod repository;

pub use models::*;
pub use mongo::Database;
pub use repository::{ConnectionRepository, FilterRepository, RequestRepository};
