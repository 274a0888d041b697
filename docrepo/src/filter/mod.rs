//! Query filters for selecting documents.
//!
//! Filters are built with the fluent API and combined with logical
//! operators:
//!
//! ```rust,ignore
//! use docrepo::filter::{all, by_id, field};
//!
//! let adults = field("age").gte(18);
//! let active_adults = adults.and(field("status").eq("active"));
//! let everyone_else = active_adults.not();
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `eq`, `ne`
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`
//! - **Membership**: `in_array`, `not_in_array`, `exists`
//! - **Logical**: `and`, `or`, `not`
//! - **Special**: `all`, `by_id`, `by_ids`, `matching`

mod filter;
mod fluent;

mod basic_filters;
mod logical_filters;
mod range_filters;

pub(crate) use basic_filters::*;
pub use filter::*;
pub use fluent::*;
pub(crate) use logical_filters::*;
pub(crate) use range_filters::*;
