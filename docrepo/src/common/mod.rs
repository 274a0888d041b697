//! Common types shared by documents, filters, updates and repositories.
//!
//! - [`Value`] - the value type stored in documents
//! - [`SortOrder`] / [`Sort`] / [`SortableFields`] - ordering intent
//! - [`Convertible`] - mapping between domain items and values
//! - constants such as [`DOC_ID`]

mod constants;
mod convertible;
mod fields;
mod sort_order;
mod type_utils;
mod value;

pub use constants::*;
pub use convertible::*;
pub use fields::*;
pub use sort_order::*;
pub use type_utils::*;
pub use value::*;
