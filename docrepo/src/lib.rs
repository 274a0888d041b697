#![allow(
    dead_code,
    unused_imports,
)]
//! # docrepo - Generic Document Repository
//!
//! docrepo separates application code from a document store. Callers work
//! with domain items or with their stored [`collection::Document`]s; a
//! [`repository::Repository`] turns lookups, pagination, inserts, removals
//! and updates into primitives of a [`store::DocumentStore`].
//!
//! ## Key Features
//!
//! - **Deterministic pagination**: page requests resolve to a counted,
//!   ordered `skip`/`limit` query, newest documents first by default
//! - **Typed filters**: equality, comparison, membership, existence and
//!   logical combinations
//! - **Typed updates**: `set`, `unset`, `inc`, `push` and `rename`
//! - **Pluggable stores**: anything implementing
//!   [`store::DocumentStoreProvider`], with an in-memory store bundled
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docrepo::doc;
//! use docrepo::collection::Document;
//! use docrepo::filter::field;
//! use docrepo::repository::{InsertOne, Pagination, Repository};
//! use docrepo::store::memory::InMemoryStore;
//!
//! let repository: Repository<Document> = Repository::builder()
//!     .name("notes")
//!     .build(InMemoryStore::default().as_document_store())?;
//!
//! repository.insert_one(InsertOne::document(doc! { title: "first", stars: 3 }))?;
//!
//! let page = repository.find_paginated(
//!     Pagination::new(0, 10).with_filter(field("stars").gte(3)),
//! )?;
//! println!("page {} of {}", page.current + 1, page.count);
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents, document identities and find options
//! - [`common`] - Values, sort orders, conversions and constants
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters
//! - [`repository`] - Repositories and pagination
//! - [`store`] - Document store clients
//! - [`update`] - Document updates

use crate::collection::snowflake::SnowflakeIdGenerator;
use std::sync::LazyLock;

pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod repository;
pub mod store;
pub mod update;

pub use common::*;

pub(crate) static ID_GENERATOR: LazyLock<SnowflakeIdGenerator> =
    LazyLock::new(SnowflakeIdGenerator::new);
