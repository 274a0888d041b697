//! Typed patches applied to stored documents.

mod update;

pub use update::*;
