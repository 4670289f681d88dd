//! Records read from the stores and hits produced by the index.
//!
//! Everything here is read-only from the query engine's point of view; rows
//! are created by the ingest job that builds the databases.

use serde::Serialize;
use std::path::{Component, Path};

use crate::reference::Translation;

/// One verse row from a translation's `bible` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    pub book_id: u32,
    pub chapter: u32,
    pub verse_number: u32,
    pub text: String,
    pub translation: Translation,
}

/// One row of the `commentary` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryEntry {
    /// Stable surrogate key, used by the context endpoint.
    pub id: i64,
    pub file_name: String,
    /// Full commentary text; the field exact and substring matching run against.
    pub text: String,
    pub father_name: String,
    pub source_title: String,
    pub source_url: String,
}

/// A full-text index hit, in index rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Path of the source document relative to the document root, `/`-separated.
    pub file_path: String,
    /// Highlighted excerpt supplied by the index.
    pub highlight: String,
}

/// Normalize a stored path to forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether `path` stays inside the directory it is resolved against:
/// relative, non-empty, and free of `..` components.
pub fn is_contained_path(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(r"fathers\0701\070101.htm"), "fathers/0701/070101.htm");
        assert_eq!(normalize_path("cathen/01001a.htm"), "cathen/01001a.htm");
    }

    #[test]
    fn test_contained_paths() {
        assert!(is_contained_path("fathers/0701.htm"));
        assert!(is_contained_path("./fathers/0701.htm"));
        assert!(!is_contained_path(""));
        assert!(!is_contained_path("../secrets.txt"));
        assert!(!is_contained_path("fathers/../../etc/passwd"));
        assert!(!is_contained_path("/etc/passwd"));
    }
}
