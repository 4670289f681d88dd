//! Full-text query construction.
//!
//! A raw query is split on whitespace, keeping double-quoted runs together.
//! Each quoted run becomes an exact [`FullTextQuery::Term`] clause; the
//! remaining words are concatenated into one [`FullTextQuery::Parsed`]
//! clause handed to a lenient boolean parser. The final query is the OR of
//! all clauses, so a document matching *any* exact term, or the free-text
//! interpretation, is a hit.
//!
//! ```text
//! grace AND "total depravity"
//!   → Or(Term("content", "total depravity"), Parsed("grace AND"))
//!   → ("total depravity") OR ("grace")
//! ```
//!
//! # Free-text parsing
//!
//! | Input | Rendered |
//! |-------|----------|
//! | `grace mercy` | `"grace" AND "mercy"` |
//! | `grace OR mercy` | `"grace" OR "mercy"` |
//! | `grace NOT law` | `"grace" NOT "law"` |
//! | `grace AND` | `"grace"` (dangling operator dropped) |
//! | `NOT law` | nothing (a negation needs a left operand) |
//! | `justif*` | `"justif"*` |
//!
//! Every word is emitted as a quoted FTS5 string, so punctuation in user
//! input (`3:16`, `-`, `(`) can never produce a syntax error. Operators are
//! only recognized in upper case; `and` is an ordinary word.

use std::fmt;

/// Name of the indexed text column, used when printing clauses.
pub const CONTENT_FIELD: &str = "content";

/// A full-text query tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullTextQuery {
    /// Exact term or phrase over the content field.
    Term(String),
    /// Free text for the lenient boolean parser.
    Parsed(String),
    /// Matches if any child matches.
    Or(Vec<FullTextQuery>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Quoted(String),
    Word(&'a str),
}

/// Split on whitespace, keeping `"quoted runs"` together.
///
/// An unterminated quote is dropped and the rest is read as plain words.
fn split_pieces(query: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = query;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix('"') {
            match after.find('"') {
                Some(close) => {
                    let phrase = after[..close].split_whitespace().collect::<Vec<_>>().join(" ");
                    if !phrase.is_empty() {
                        pieces.push(Piece::Quoted(phrase));
                    }
                    rest = &after[close + 1..];
                }
                None => rest = after,
            }
            continue;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        pieces.push(Piece::Word(&rest[..end]));
        rest = &rest[end..];
    }
    pieces
}

impl FullTextQuery {
    /// Build the OR of every exact term and the free-text remainder.
    ///
    /// Exact clauses come first, in query order; the parsed clause is last
    /// and omitted when no free-text words remain.
    pub fn build(query: &str) -> Self {
        let mut clauses = Vec::new();
        let mut words = Vec::new();
        for piece in split_pieces(query) {
            match piece {
                Piece::Quoted(phrase) => clauses.push(FullTextQuery::Term(phrase)),
                Piece::Word(w) => words.push(w),
            }
        }
        if !words.is_empty() {
            clauses.push(FullTextQuery::Parsed(words.join(" ")));
        }
        FullTextQuery::Or(clauses)
    }

    /// Render as an FTS5 `MATCH` expression.
    ///
    /// Returns `None` when nothing searchable remains, in which case the
    /// query matches no documents.
    pub fn to_fts5(&self) -> Option<String> {
        match self {
            FullTextQuery::Term(text) => quote(text),
            FullTextQuery::Parsed(text) => parse_free_text(text),
            FullTextQuery::Or(children) => {
                let parts: Vec<String> = children
                    .iter()
                    .filter_map(|c| c.to_fts5())
                    .map(|p| format!("({})", p))
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" OR "))
                }
            }
        }
    }
}

impl fmt::Display for FullTextQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FullTextQuery::Term(text) => write!(f, "Term({:?}, {:?})", CONTENT_FIELD, text),
            FullTextQuery::Parsed(text) => write!(f, "Parsed({:?})", text),
            FullTextQuery::Or(children) => {
                f.write_str("Or(")?;
                for (i, c) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// The combined search term used to anchor context windows: every term of
/// the query with surrounding quotes removed, joined by single spaces.
pub fn search_anchor(query: &str) -> String {
    split_pieces(query)
        .into_iter()
        .map(|p| match p {
            Piece::Quoted(phrase) => phrase,
            Piece::Word(w) => w.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
    Not,
}

impl Op {
    fn as_str(&self) -> &'static str {
        match self {
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
        }
    }
}

fn parse_free_text(text: &str) -> Option<String> {
    let mut out: Vec<String> = Vec::new();
    let mut pending: Option<Op> = None;

    for word in text.split_whitespace() {
        match word {
            "AND" => pending = Some(Op::And),
            "OR" => pending = Some(Op::Or),
            "NOT" => pending = Some(Op::Not),
            _ => {
                let Some(operand) = operand(word) else {
                    continue;
                };
                if out.is_empty() {
                    if pending == Some(Op::Not) {
                        pending = None;
                        continue;
                    }
                } else {
                    out.push(pending.unwrap_or(Op::And).as_str().to_string());
                }
                out.push(operand);
                pending = None;
            }
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out.join(" "))
    }
}

fn operand(word: &str) -> Option<String> {
    match word.strip_suffix('*') {
        Some(stem) => quote(stem).map(|q| format!("{}*", q)),
        None => quote(word),
    }
}

/// Quote as an FTS5 string; `None` if there is nothing indexable in it.
fn quote(text: &str) -> Option<String> {
    if !text.chars().any(char::is_alphanumeric) {
        return None;
    }
    Some(format!("\"{}\"", text.replace('"', "\"\"")))
}
