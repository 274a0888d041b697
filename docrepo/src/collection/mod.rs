//! Document model: documents, their identities and find options.

mod document;
mod document_id;
mod find_options;
pub(crate) mod snowflake;

pub use document::*;
pub use document_id::*;
pub use find_options::*;
