//! Scripture reference parsing.
//!
//! Recognizes `<book> <chapter>:<verse>[-<endVerse>]` anywhere in free text,
//! e.g. `"compare John 3:16 with 1 John 4:9-10"`. A query may embed several
//! references; each one whose book resolves through [`crate::books`] is
//! returned, the rest are silently dropped.
//!
//! The translation is resolved separately from the grammar: the first of the
//! six recognized codes appearing as a whole word anywhere in the query wins,
//! otherwise the caller's default (normally ESV) applies.
//!
//! # Example
//!
//! ```rust
//! use lectio_core::reference::{parse, Translation};
//!
//! let refs = parse("what does John 3:16-18 say? kjv");
//! assert_eq!(refs.len(), 1);
//! assert_eq!(refs[0].book_id, 42);
//! assert_eq!((refs[0].start_verse, refs[0].end_verse), (16, 18));
//! assert_eq!(refs[0].translation, Translation::Kjv);
//! ```

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::books;

/// A Bible translation with its own verse store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Translation {
    #[default]
    Esv,
    Kjv,
    Amp,
    Bsb,
    Gen,
    Nasb,
}

impl Translation {
    pub const ALL: [Translation; 6] = [
        Translation::Esv,
        Translation::Kjv,
        Translation::Amp,
        Translation::Bsb,
        Translation::Gen,
        Translation::Nasb,
    ];

    /// Upper-case code, also the stem of the translation's database file.
    pub fn code(&self) -> &'static str {
        match self {
            Translation::Esv => "ESV",
            Translation::Kjv => "KJV",
            Translation::Amp => "AMP",
            Translation::Bsb => "BSB",
            Translation::Gen => "GEN",
            Translation::Nasb => "NASB",
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Translation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Translation::ALL
            .iter()
            .find(|t| t.code().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown translation '{}': expected one of ESV, KJV, AMP, BSB, GEN, NASB",
                    s
                )
            })
    }
}

/// Accepts a code in any case, like [`FromStr`].
impl<'de> Deserialize<'de> for Translation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// A resolved `(book, chapter, verse range, translation)` tuple.
///
/// Invariant: `start_verse <= end_verse` and `book_id < 66`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptureReference {
    pub book_id: u32,
    pub book_name: String,
    pub chapter: u32,
    pub start_verse: u32,
    pub end_verse: u32,
    pub translation: Translation,
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book_name, self.chapter, self.start_verse)?;
        if self.end_verse != self.start_verse {
            write!(f, "-{}", self.end_verse)?;
        }
        write!(f, " ({})", self.translation)
    }
}

/// Everything the parser extracted from one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceQuery {
    pub references: Vec<ScriptureReference>,
    /// Translation applied to every reference.
    pub translation: Translation,
    /// Whether a translation code appeared in the query text.
    pub explicit_translation: bool,
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([0-9]?\s*[a-z]+(?:\s+[a-z]+)*)\s([0-9]+):([0-9]+)(?:-([0-9]+))?")
            .expect("reference pattern is valid")
    })
}

fn translation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(esv|kjv|amp|bsb|gen|nasb)\b").expect("translation pattern is valid")
    })
}

/// Parse all references in `query`, defaulting the translation to ESV.
pub fn parse(query: &str) -> Vec<ScriptureReference> {
    parse_query(query, Translation::default()).references
}

/// Find the first translation code in `query` (whole word, any case).
pub fn detect_translation(query: &str) -> Option<Translation> {
    let lowered = query.to_lowercase();
    translation_pattern()
        .find(&lowered)
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse all references in `query`, using `default` when no code is present.
pub fn parse_query(query: &str, default: Translation) -> ReferenceQuery {
    let detected = detect_translation(query);
    let translation = detected.unwrap_or(default);

    let lowered = query.to_lowercase();
    let mut references = Vec::new();

    for caps in reference_pattern().captures_iter(&lowered) {
        let capture = caps[1].trim();
        let Some(book_id) = resolve_book(capture) else {
            tracing::debug!(book = capture, "dropping reference to unknown book");
            continue;
        };

        let numbers = (
            caps[2].parse::<u32>(),
            caps[3].parse::<u32>(),
            caps.get(4).map(|m| m.as_str().parse::<u32>()),
        );
        let (chapter, start, end) = match numbers {
            (Ok(c), Ok(s), None) => (c, s, s),
            (Ok(c), Ok(s), Some(Ok(e))) => (c, s, e),
            _ => {
                tracing::debug!(reference = &caps[0], "dropping reference with oversized number");
                continue;
            }
        };
        let (start_verse, end_verse) = if end < start { (end, start) } else { (start, end) };

        references.push(ScriptureReference {
            book_id,
            book_name: books::canonical_name(book_id)
                .unwrap_or_default()
                .to_string(),
            chapter,
            start_verse,
            end_verse,
            translation,
        });
    }

    ReferenceQuery {
        references,
        translation,
        explicit_translation: detected.is_some(),
    }
}

/// Longest trailing word sequence of `capture` that names a book.
///
/// The grammar's book capture is greedy, so `"what does john"` must still
/// resolve to John. Suffixes are sliced from the capture itself, keeping its
/// internal spacing intact.
fn resolve_book(capture: &str) -> Option<u32> {
    let mut starts = vec![0];
    let bytes = capture.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i - 1].is_ascii_whitespace() && !bytes[i].is_ascii_whitespace() {
            starts.push(i);
        }
    }
    starts
        .into_iter()
        .find_map(|start| books::book_id(&capture[start..]))
}
