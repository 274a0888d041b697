//! Document store clients consumed by repositories.
//!
//! A store is anything implementing [DocumentStoreProvider]. The crate ships
//! [memory::InMemoryStore], which keeps documents in process memory.

mod document_store;
pub mod memory;

pub use document_store::*;
