//! Database document models.

pub mod common;
pub mod connection;
pub mod filter;
pub mod request;

pub use common::InlineButton;
pub use connection::{GroupConnection, KnownGroup};
pub use filter::{FilterKind, FilterRecord};
pub use request::MovieRequest;
