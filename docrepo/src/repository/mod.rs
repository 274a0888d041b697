//! Repositories over a document store.
//!
//! A [`Repository`] resolves lookups, pagination, inserts, removals and
//! updates against a [`crate::store::DocumentStore`]. Pagination requests are
//! turned into a counted, ordered `skip`/`limit` query; see [`PageWindow`].

mod config;
mod default_repository;
mod pagination;
mod repository;
mod selectors;

pub use config::*;
pub(crate) use default_repository::*;
pub use pagination::*;
pub use repository::*;
pub use selectors::{InsertMany, InsertOne, RemoveMany, RemoveOne};
