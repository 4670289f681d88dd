//! SQLite-backed adapters.
//!
//! | Adapter | Database | Table |
//! |---------|----------|-------|
//! | [`SqliteCommentaryStore`] | `[commentary].path` | `commentary(id, file_name, txt, father_name, source_title, source_url)` |
//! | [`SqliteVerseStore`] | `[bible]` registry, one file per translation | `bible(Book, Chapter, Versecount, Verse)` |
//! | [`SqliteFullTextIndex`] | `[index].path` | FTS5 `documents_fts(file_path UNINDEXED, content)` |
//!
//! All databases are opened read-only. The verse store opens and closes a
//! pool per lookup since the translation is only known once the query has
//! been parsed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lectio_core::fulltext::FullTextQuery;
use lectio_core::models::{CommentaryEntry, SearchHit, VerseRecord};
use lectio_core::store::{CommentaryStore, FullTextIndex, VerseStore};
use lectio_core::{ScriptureReference, Translation};

use crate::config::BibleConfig;
use crate::db;

const COMMENTARY_COLUMNS: &str =
    "id, file_name, txt, father_name, source_title, COALESCE(source_url, '') AS source_url";

/// Escape `\`, `%` and `_` so `text` matches literally under `LIKE ... ESCAPE '\'`.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn commentary_entry(row: &SqliteRow) -> CommentaryEntry {
    CommentaryEntry {
        id: row.get("id"),
        file_name: row.get("file_name"),
        text: row.get("txt"),
        father_name: row.get("father_name"),
        source_title: row.get("source_title"),
        source_url: row.get("source_url"),
    }
}

/// The `commentary` table.
pub struct SqliteCommentaryStore {
    pool: SqlitePool,
}

impl SqliteCommentaryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the underlying pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CommentaryStore for SqliteCommentaryStore {
    async fn find_exact(&self, text: &str, limit: i64) -> Result<Vec<CommentaryEntry>> {
        let sql = format!("SELECT {} FROM commentary WHERE txt = ? LIMIT ?", COMMENTARY_COLUMNS);
        let rows = sqlx::query(&sql)
            .bind(text)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("commentary exact lookup failed")?;
        Ok(rows.iter().map(commentary_entry).collect())
    }

    async fn find_containing(&self, text: &str, limit: i64) -> Result<Vec<CommentaryEntry>> {
        let sql = format!(
            r"SELECT {} FROM commentary WHERE txt LIKE ? ESCAPE '\' LIMIT ?",
            COMMENTARY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(format!("%{}%", escape_like(text)))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("commentary substring lookup failed")?;
        Ok(rows.iter().map(commentary_entry).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CommentaryEntry>> {
        let sql = format!("SELECT {} FROM commentary WHERE id = ?", COMMENTARY_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("commentary id lookup failed")?;
        Ok(row.as_ref().map(commentary_entry))
    }
}

/// Database file per translation, resolved once from `[bible]`.
#[derive(Debug, Clone)]
pub struct BibleRegistry {
    paths: HashMap<Translation, PathBuf>,
}

impl BibleRegistry {
    pub fn from_config(bible: &BibleConfig) -> Self {
        let paths = Translation::ALL
            .iter()
            .map(|&t| (t, bible.path_for(t)))
            .collect();
        Self { paths }
    }

    pub fn path(&self, translation: Translation) -> Option<&Path> {
        self.paths.get(&translation).map(PathBuf::as_path)
    }
}

/// Per-translation `bible` tables, selected by the reference's translation.
pub struct SqliteVerseStore {
    registry: BibleRegistry,
}

impl SqliteVerseStore {
    pub fn new(registry: BibleRegistry) -> Self {
        Self { registry }
    }
}

fn column_u32(row: &SqliteRow, col: &str) -> Result<u32> {
    let value: i64 = row.try_get(col)?;
    u32::try_from(value).with_context(|| format!("{} out of range: {}", col, value))
}

async fn fetch_verses(pool: &SqlitePool, reference: &ScriptureReference) -> Result<Vec<VerseRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT Book, Chapter, Versecount, Verse
        FROM bible
        WHERE Book = ? AND Chapter = ? AND Versecount BETWEEN ? AND ?
        ORDER BY Versecount
        "#,
    )
    .bind(reference.book_id as i64)
    .bind(reference.chapter as i64)
    .bind(reference.start_verse as i64)
    .bind(reference.end_verse as i64)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(VerseRecord {
                book_id: column_u32(row, "Book")?,
                chapter: column_u32(row, "Chapter")?,
                verse_number: column_u32(row, "Versecount")?,
                text: row.try_get("Verse")?,
                translation: reference.translation,
            })
        })
        .collect()
}

#[async_trait]
impl VerseStore for SqliteVerseStore {
    async fn verses(&self, reference: &ScriptureReference) -> Result<Vec<VerseRecord>> {
        let path = self
            .registry
            .path(reference.translation)
            .with_context(|| format!("no database configured for {}", reference.translation))?;
        tracing::debug!(reference = %reference, path = %path.display(), "verse lookup");

        let pool = db::connect(path).await?;
        let result = fetch_verses(&pool, reference).await;
        pool.close().await;

        result.with_context(|| format!("verse lookup failed for {}", reference))
    }
}

/// FTS5 search over `documents_fts`.
pub struct SqliteFullTextIndex {
    pool: SqlitePool,
}

impl SqliteFullTextIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl FullTextIndex for SqliteFullTextIndex {
    async fn search(&self, query: &FullTextQuery, limit: i64) -> Result<Vec<SearchHit>> {
        let Some(expr) = query.to_fts5() else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT file_path,
                   snippet(documents_fts, 1, '<b class="match">', '</b>', '...', 32) AS highlight
            FROM documents_fts
            WHERE documents_fts MATCH ?
            ORDER BY rank
            LIMIT ?
            "#,
        )
        .bind(&expr)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("full-text search failed for {}", expr))?;

        Ok(rows
            .iter()
            .map(|row| SearchHit {
                file_path: row.get("file_path"),
                highlight: row.get("highlight"),
            })
            .collect())
    }
}
