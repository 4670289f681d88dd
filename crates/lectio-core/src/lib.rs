//! # Lectio Core
//!
//! Storage-independent logic for Lectio: scripture reference parsing, the
//! canonical book table, full-text query construction, HTML page parsing,
//! context-window extraction, and the query router that ties them together.
//!
//! This crate contains no sqlx, filesystem I/O, or other native runtime
//! dependencies. Storage is reached through the traits in [`store`]; the
//! application crate supplies SQLite and filesystem implementations.

pub mod books;
pub mod context;
pub mod error;
pub mod fulltext;
pub mod models;
pub mod page;
pub mod reference;
pub mod router;
pub mod store;

pub use error::QueryError;
pub use reference::{ScriptureReference, Translation};
pub use router::{ContextRequest, ContextResponse, QueryRouter, RouterOptions, SearchResponse};
