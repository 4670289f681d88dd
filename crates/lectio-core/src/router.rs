//! Query routing.
//!
//! Every query goes through the same states:
//!
//! ```text
//! Received ──classify──▶ Reference ─┐
//!          └───────────▶ FreeText ──┴─resolve─▶ Aggregated
//!                                      └──────▶ Failed (any adapter error)
//! ```
//!
//! **Classification** is syntactic: a query containing `:` is treated as a
//! scripture reference, anything else as free text. A colon with no valid
//! reference still takes the reference branch and may legitimately produce
//! zero verses.
//!
//! **Reference branch:** parse references, fetch verses from the selected
//! translation, run the commentary exact and substring lookups on the raw
//! text, and (when enabled and no translation code was given) run the
//! full-text index on the raw text as a secondary signal.
//!
//! **Free-text branch:** run the full-text index, then extract context
//! windows from each hit's document.
//!
//! Branch results stay in separate arrays; nothing is interleaved or
//! re-ranked across branches. An adapter failure fails the whole request.

use serde::Serialize;

use crate::books::{BookIds, DisplayNames};
use crate::context::{ContextExtractor, ContextWindow, DEFAULT_RADIUS};
use crate::error::QueryError;
use crate::fulltext::{search_anchor, FullTextQuery};
use crate::models::{is_contained_path, normalize_path, CommentaryEntry, VerseRecord};
use crate::page::{DocumentPage, NO_BREADCRUMB_FOUND, NO_TITLE, NO_TITLE_FOUND};
use crate::reference::{parse_query, ScriptureReference, Translation};
use crate::store::{CommentaryStore, DocumentSource, FullTextIndex, VerseStore};

/// Which branch a query takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Reference,
    FreeText,
}

/// Classify a raw query. Only the presence of `:` matters.
pub fn classify(query: &str) -> QueryKind {
    if query.contains(':') {
        QueryKind::Reference
    } else {
        QueryKind::FreeText
    }
}

/// Tuning knobs, decoupled from application config.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Cap for each commentary lookup and for full-text hits.
    pub result_limit: i64,
    /// Commentary preview length, in chars, before `"..."` is appended.
    pub commentary_snippet_chars: usize,
    /// Half-width of context windows, in chars.
    pub context_radius: usize,
    /// Run the full-text index in the reference branch when the query
    /// names no translation.
    pub fulltext_fallback: bool,
    /// Translation used when the query names none.
    pub default_translation: Translation,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            result_limit: 20,
            commentary_snippet_chars: 700,
            context_radius: DEFAULT_RADIUS,
            fulltext_fallback: true,
            default_translation: Translation::Esv,
        }
    }
}

/// A full-text hit enriched from its source document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHit {
    pub file_path: String,
    /// Highlighted excerpt from the index.
    pub content_snippet: String,
    pub h1: String,
    pub breadcrumb: String,
    /// Windows around the search anchor in the document's plain text.
    pub contexts: Vec<ContextWindow>,
}

/// A commentary entry shaped like a document hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryHit {
    pub id: i64,
    pub file_path: String,
    pub content_snippet: String,
    /// Father name.
    pub h1: String,
    /// Source title.
    pub breadcrumb: String,
}

/// A verse in the reference response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseResult {
    pub book: u32,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl From<VerseRecord> for VerseResult {
    fn from(v: VerseRecord) -> Self {
        Self {
            book: v.book_id,
            chapter: v.chapter,
            verse: v.verse_number,
            text: v.text,
        }
    }
}

/// Response of the free-text branch.
#[derive(Debug, Clone, Serialize)]
pub struct FreeTextResponse {
    pub query: String,
    pub results: Vec<DocumentHit>,
}

/// Response of the reference branch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResponse {
    pub query: String,
    /// Always `"bible"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Verses of every resolved reference, in reference order.
    pub results: Vec<VerseResult>,
    pub references: Vec<ScriptureReference>,
    /// Exact matches first, then substring matches; duplicates kept.
    pub commentary: Vec<CommentaryHit>,
    /// Secondary full-text hits (fallback only).
    pub documents: Vec<DocumentHit>,
    pub book_data: BookIds,
    pub display_book_data: DisplayNames,
    pub bible_version: Translation,
}

/// The aggregated result of one query.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Reference(ReferenceResponse),
    FreeText(FreeTextResponse),
}

/// Context lookup: by commentary id if given, otherwise by document path.
#[derive(Debug, Clone, Default)]
pub struct ContextRequest {
    /// Text to locate; required for a document lookup, ignored for an id.
    pub query: Option<String>,
    pub file_path: Option<String>,
    pub id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub contexts: Vec<String>,
    pub breadcrumb_text: String,
    pub h1_text: String,
}

/// Routes queries to the adapters and aggregates their results.
///
/// Holds borrowed adapters only, so one router is built per request around
/// whatever stores that request opened.
pub struct QueryRouter<'a> {
    verses: &'a dyn VerseStore,
    commentary: &'a dyn CommentaryStore,
    index: &'a dyn FullTextIndex,
    documents: &'a dyn DocumentSource,
    options: RouterOptions,
}

impl<'a> QueryRouter<'a> {
    pub fn new(
        verses: &'a dyn VerseStore,
        commentary: &'a dyn CommentaryStore,
        index: &'a dyn FullTextIndex,
        documents: &'a dyn DocumentSource,
        options: RouterOptions,
    ) -> Self {
        Self {
            verses,
            commentary,
            index,
            documents,
            options,
        }
    }

    /// Run one query end to end.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::InvalidRequest("query must not be empty".to_string()));
        }

        let kind = classify(query);
        tracing::debug!(query, ?kind, "classified query");

        match kind {
            QueryKind::Reference => self.search_reference(query).await.map(SearchResponse::Reference),
            QueryKind::FreeText => self.search_free_text(query).await.map(SearchResponse::FreeText),
        }
    }

    async fn search_reference(&self, query: &str) -> Result<ReferenceResponse, QueryError> {
        let parsed = parse_query(query, self.options.default_translation);
        tracing::debug!(
            references = parsed.references.len(),
            translation = %parsed.translation,
            explicit = parsed.explicit_translation,
            "parsed references"
        );

        let mut results = Vec::new();
        for reference in &parsed.references {
            let verses = self.verses.verses(reference).await?;
            results.extend(verses.into_iter().map(VerseResult::from));
        }

        let commentary = self.commentary_hits(query).await?;

        let documents = if self.options.fulltext_fallback && !parsed.explicit_translation {
            self.document_hits(query).await?
        } else {
            Vec::new()
        };

        Ok(ReferenceResponse {
            query: query.to_string(),
            kind: "bible",
            results,
            references: parsed.references,
            commentary,
            documents,
            book_data: BookIds,
            display_book_data: DisplayNames,
            bible_version: parsed.translation,
        })
    }

    async fn search_free_text(&self, query: &str) -> Result<FreeTextResponse, QueryError> {
        Ok(FreeTextResponse {
            query: query.to_string(),
            results: self.document_hits(query).await?,
        })
    }

    /// Exact matches followed by substring matches, without deduplication.
    async fn commentary_hits(&self, query: &str) -> Result<Vec<CommentaryHit>, QueryError> {
        let limit = self.options.result_limit;
        let exact = self.commentary.find_exact(query, limit).await?;
        let containing = self.commentary.find_containing(query, limit).await?;

        Ok(exact
            .into_iter()
            .chain(containing)
            .map(|e| self.commentary_hit(e))
            .collect())
    }

    fn commentary_hit(&self, entry: CommentaryEntry) -> CommentaryHit {
        let mut snippet: String = entry
            .text
            .chars()
            .take(self.options.commentary_snippet_chars)
            .collect();
        snippet.push_str("...");
        CommentaryHit {
            id: entry.id,
            file_path: entry.file_name,
            content_snippet: snippet,
            h1: entry.father_name,
            breadcrumb: entry.source_title,
        }
    }

    async fn document_hits(&self, query: &str) -> Result<Vec<DocumentHit>, QueryError> {
        let fts = FullTextQuery::build(query);
        tracing::debug!(query = %fts, "full-text query");

        let hits = self.index.search(&fts, self.options.result_limit).await?;
        let anchor = search_anchor(query);
        let extractor = ContextExtractor::new(self.options.context_radius);

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let file_path = normalize_path(&hit.file_path);
            if !is_contained_path(&file_path) {
                return Err(anyhow::anyhow!("index returned unsafe path: {}", file_path).into());
            }
            let html = self
                .documents
                .load(&file_path)
                .await?
                .ok_or_else(|| anyhow::anyhow!("indexed document missing: {}", file_path))?;
            let page = DocumentPage::parse(&html);

            results.push(DocumentHit {
                contexts: extractor.extract(&page.text, &anchor),
                breadcrumb: page.breadcrumb_trail(),
                h1: page.title.unwrap_or_else(|| NO_TITLE.to_string()),
                content_snippet: hit.highlight,
                file_path,
            });
        }
        Ok(results)
    }

    /// Context windows for a commentary entry or a document.
    ///
    /// A commentary entry is returned whole as a single context. A document
    /// is reduced to windows around `query`.
    pub async fn context(&self, req: &ContextRequest) -> Result<ContextResponse, QueryError> {
        if let Some(id) = req.id {
            let entry = self
                .commentary
                .find_by_id(id)
                .await?
                .ok_or_else(|| QueryError::NotFound(format!("no data found for id {}", id)))?;
            return Ok(ContextResponse {
                contexts: vec![entry.text],
                breadcrumb_text: entry.source_title,
                h1_text: entry.father_name,
            });
        }

        let Some(file_path) = req.file_path.as_deref() else {
            return Err(QueryError::InvalidRequest(
                "either id or filePath is required".to_string(),
            ));
        };
        let Some(query) = req.query.as_deref() else {
            return Err(QueryError::InvalidRequest(
                "query is required with filePath".to_string(),
            ));
        };
        let file_path = normalize_path(file_path);
        if !is_contained_path(&file_path) {
            return Err(QueryError::InvalidRequest(format!(
                "filePath must be relative to the document root: {}",
                file_path
            )));
        }

        let html = self
            .documents
            .load(&file_path)
            .await?
            .ok_or_else(|| QueryError::NotFound(format!("no document found at {}", file_path)))?;
        let page = DocumentPage::parse(&html);

        let contexts = ContextExtractor::new(self.options.context_radius)
            .extract(&page.text, query)
            .into_iter()
            .map(|w| w.text)
            .collect();

        Ok(ContextResponse {
            contexts,
            breadcrumb_text: page
                .breadcrumb_text
                .unwrap_or_else(|| NO_BREADCRUMB_FOUND.to_string()),
            h1_text: page.title.unwrap_or_else(|| NO_TITLE_FOUND.to_string()),
        })
    }
}
