//! Read-only adapter traits.
//!
//! The router never touches a database or the filesystem directly; it talks
//! to these four traits. The application crate provides SQLite and
//! filesystem implementations, [`memory`] provides in-memory ones for tests.
//!
//! | Trait | Backing data |
//! |-------|--------------|
//! | [`VerseStore`] | one `bible` table per translation |
//! | [`CommentaryStore`] | the `commentary` table |
//! | [`FullTextIndex`] | the inverted index over `(file_path, content)` |
//! | [`DocumentSource`] | the HTML documents the index points at |
//!
//! Implementations must be `Send + Sync`; none of them writes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::fulltext::FullTextQuery;
use crate::models::{CommentaryEntry, SearchHit, VerseRecord};
use crate::reference::ScriptureReference;

/// Verse lookup, routed by the reference's translation.
#[async_trait]
pub trait VerseStore: Send + Sync {
    /// Verses of `reference.book_id` / `reference.chapter` whose number lies
    /// in `start_verse..=end_verse`, in verse order.
    async fn verses(&self, reference: &ScriptureReference) -> Result<Vec<VerseRecord>>;
}

/// Commentary lookup by text.
///
/// Both text lookups return at most `limit` rows in storage order. Callers
/// that run both and concatenate the results will see an entry twice when it
/// satisfies both predicates; that is intended and must not be deduplicated.
#[async_trait]
pub trait CommentaryStore: Send + Sync {
    /// Entries whose full text equals `text`.
    async fn find_exact(&self, text: &str, limit: i64) -> Result<Vec<CommentaryEntry>>;

    /// Entries whose text contains `text` (ASCII case-insensitive).
    async fn find_containing(&self, text: &str, limit: i64) -> Result<Vec<CommentaryEntry>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CommentaryEntry>>;
}

/// Ranked search over the inverted index.
#[async_trait]
pub trait FullTextIndex: Send + Sync {
    /// Up to `limit` hits in rank order. A query with nothing searchable
    /// returns no hits rather than an error.
    async fn search(&self, query: &FullTextQuery, limit: i64) -> Result<Vec<SearchHit>>;
}

/// Raw HTML of indexed documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// The document at `file_path`, or `None` if it does not exist.
    async fn load(&self, file_path: &str) -> Result<Option<String>>;
}
