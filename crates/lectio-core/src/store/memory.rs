//! In-memory adapters for tests and embedding.
//!
//! Each store is built once from plain rows and then only read. The index
//! does substring matching instead of tokenized search: an exact term matches
//! when the phrase occurs (case-insensitively), the free-text clause matches
//! when every non-operator word occurs. Boolean operators inside the
//! free-text clause are ignored.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::fulltext::FullTextQuery;
use crate::models::{CommentaryEntry, SearchHit, VerseRecord};
use crate::reference::ScriptureReference;

use super::{CommentaryStore, DocumentSource, FullTextIndex, VerseStore};

/// Highlight length for in-memory hits, in chars.
const HIGHLIGHT_CHARS: usize = 160;

/// Verse rows for any number of translations.
#[derive(Debug, Default)]
pub struct InMemoryVerseStore {
    rows: Vec<VerseRecord>,
}

impl InMemoryVerseStore {
    pub fn new(rows: Vec<VerseRecord>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl VerseStore for InMemoryVerseStore {
    async fn verses(&self, reference: &ScriptureReference) -> Result<Vec<VerseRecord>> {
        let mut found: Vec<VerseRecord> = self
            .rows
            .iter()
            .filter(|v| {
                v.translation == reference.translation
                    && v.book_id == reference.book_id
                    && v.chapter == reference.chapter
                    && (reference.start_verse..=reference.end_verse).contains(&v.verse_number)
            })
            .cloned()
            .collect();
        found.sort_by_key(|v| v.verse_number);
        Ok(found)
    }
}

/// Commentary rows in storage order.
#[derive(Debug, Default)]
pub struct InMemoryCommentaryStore {
    entries: Vec<CommentaryEntry>,
}

impl InMemoryCommentaryStore {
    pub fn new(entries: Vec<CommentaryEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl CommentaryStore for InMemoryCommentaryStore {
    async fn find_exact(&self, text: &str, limit: i64) -> Result<Vec<CommentaryEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.text == text)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_containing(&self, text: &str, limit: i64) -> Result<Vec<CommentaryEntry>> {
        // Mirrors SQLite LIKE: ASCII letters compare case-insensitively.
        let needle = text.to_ascii_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|e| e.text.to_ascii_lowercase().contains(&needle))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CommentaryEntry>> {
        Ok(self.entries.iter().find(|e| e.id == id).cloned())
    }
}

/// `(file_path, content)` pairs searched by substring.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    docs: Vec<(String, String)>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_path: impl Into<String>, content: impl Into<String>) {
        self.docs.push((file_path.into(), content.into()));
    }
}

fn query_matches(query: &FullTextQuery, folded: &str) -> bool {
    match query {
        FullTextQuery::Term(phrase) => folded.contains(&phrase.to_lowercase()),
        FullTextQuery::Parsed(text) => {
            let words: Vec<String> = text
                .split_whitespace()
                .filter(|w| !matches!(*w, "AND" | "OR" | "NOT"))
                .map(|w| {
                    w.trim_matches(|c: char| !c.is_alphanumeric())
                        .to_lowercase()
                })
                .filter(|w| !w.is_empty())
                .collect();
            !words.is_empty() && words.iter().all(|w| folded.contains(w.as_str()))
        }
        FullTextQuery::Or(children) => children.iter().any(|c| query_matches(c, folded)),
    }
}

#[async_trait]
impl FullTextIndex for InMemoryIndex {
    async fn search(&self, query: &FullTextQuery, limit: i64) -> Result<Vec<SearchHit>> {
        Ok(self
            .docs
            .iter()
            .filter(|(_, content)| query_matches(query, &content.to_lowercase()))
            .take(limit.max(0) as usize)
            .map(|(path, content)| SearchHit {
                file_path: path.clone(),
                highlight: content.chars().take(HIGHLIGHT_CHARS).collect(),
            })
            .collect())
    }
}

/// HTML documents keyed by path.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    docs: HashMap<String, String>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_path: impl Into<String>, html: impl Into<String>) {
        self.docs.insert(file_path.into(), html.into());
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocuments {
    async fn load(&self, file_path: &str) -> Result<Option<String>> {
        Ok(self.docs.get(file_path).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{parse, Translation};

    fn entry(id: i64, text: &str) -> CommentaryEntry {
        CommentaryEntry {
            id,
            file_name: format!("{}.txt", id),
            text: text.to_string(),
            father_name: "Augustine".to_string(),
            source_title: "Tractates on John".to_string(),
            source_url: String::new(),
        }
    }

    fn verse(t: Translation, book: u32, chapter: u32, n: u32) -> VerseRecord {
        VerseRecord {
            book_id: book,
            chapter,
            verse_number: n,
            text: format!("{} {}:{}", t, chapter, n),
            translation: t,
        }
    }

    #[tokio::test]
    async fn test_verse_range_and_translation() {
        let store = InMemoryVerseStore::new(vec![
            verse(Translation::Esv, 42, 3, 17),
            verse(Translation::Esv, 42, 3, 16),
            verse(Translation::Kjv, 42, 3, 16),
            verse(Translation::Esv, 42, 4, 16),
            verse(Translation::Esv, 42, 3, 18),
        ]);
        let r = &parse("John 3:16-17")[0];
        let found = store.verses(r).await.unwrap();
        let numbers: Vec<u32> = found.iter().map(|v| v.verse_number).collect();
        assert_eq!(numbers, vec![16, 17]);
        assert!(found.iter().all(|v| v.translation == Translation::Esv));
    }

    #[tokio::test]
    async fn test_commentary_limits_and_case() {
        let store = InMemoryCommentaryStore::new(vec![
            entry(1, "On JOHN 3:16, God so loved"),
            entry(2, "John 3:16"),
            entry(3, "nothing relevant"),
        ]);
        assert_eq!(store.find_exact("John 3:16", 20).await.unwrap().len(), 1);
        assert_eq!(store.find_exact("john 3:16", 20).await.unwrap().len(), 0);
        assert_eq!(store.find_containing("john 3:16", 20).await.unwrap().len(), 2);
        assert_eq!(store.find_containing("john 3:16", 1).await.unwrap().len(), 1);
        assert_eq!(store.find_by_id(3).await.unwrap().unwrap().text, "nothing relevant");
        assert!(store.find_by_id(17).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_index_or_semantics() {
        let mut index = InMemoryIndex::new();
        index.insert("a.htm", "On total depravity and the will");
        index.insert("b.htm", "Grace abounds");
        index.insert("c.htm", "Nothing to see");

        let q = FullTextQuery::build("grace AND \"total depravity\"");
        let hits = index.search(&q, 20).await.unwrap();
        let paths: Vec<&str> = hits.iter().map(|h| h.file_path.as_str()).collect();
        assert_eq!(paths, vec!["a.htm", "b.htm"]);

        let empty = FullTextQuery::build("AND");
        assert!(index.search(&empty, 20).await.unwrap().is_empty());
    }
}
