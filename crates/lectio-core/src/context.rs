//! Context-window extraction around search-term occurrences.
//!
//! Given a document's plain text and a term, returns one bounded snippet per
//! occurrence, so a reader can see the match in its surroundings without
//! loading the whole document.
//!
//! # Algorithm
//!
//! 1. Case-fold text and term once (one char in, one char out, so offsets
//!    in the folded text are offsets in the original).
//! 2. Find the first occurrence of the term.
//! 3. Emit the window `[max(0, hit - radius), min(len, hit + radius + term_len))`.
//! 4. Resume scanning at the **end of that window**, not after the hit.
//!    A second occurrence inside the window is not reported again.
//! 5. Stop when no further occurrence exists.
//!
//! If the term never occurs (or is empty), a single window covering the
//! first `2 * radius` chars is returned instead.
//!
//! All offsets are in chars (Unicode scalar values).

use serde::Serialize;

/// Default half-width of a window, in chars.
pub const DEFAULT_RADIUS: usize = 560;

/// A snippet of a document around one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextWindow {
    pub text: String,
    /// Inclusive start, in chars.
    pub start_offset: usize,
    /// Exclusive end, in chars.
    pub end_offset: usize,
}

/// Extracts bounded windows around each occurrence of a term.
#[derive(Debug, Clone, Copy)]
pub struct ContextExtractor {
    radius: usize,
}

impl Default for ContextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}

impl ContextExtractor {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    /// Width of the window returned when the term is absent.
    pub fn fallback_width(&self) -> usize {
        self.radius * 2
    }

    /// Return every window around `term` in `text`, case-insensitively.
    ///
    /// Never returns an empty vector.
    pub fn extract(&self, text: &str, term: &str) -> Vec<ContextWindow> {
        let chars: Vec<char> = text.chars().collect();
        let folded: Vec<char> = chars.iter().map(|&c| fold(c)).collect();
        let needle: Vec<char> = term.chars().map(fold).collect();

        let mut windows = Vec::new();
        let mut cursor = 0;

        while let Some(hit) = find_from(&folded, &needle, cursor) {
            let start = hit.saturating_sub(self.radius);
            let end = (hit + self.radius + needle.len()).min(chars.len());
            windows.push(window(&chars, start, end));
            cursor = end;
        }

        if windows.is_empty() {
            let end = self.fallback_width().min(chars.len());
            windows.push(window(&chars, 0, end));
        }

        windows
    }
}

/// Single-char case folding; chars whose lowercase form expands are kept.
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn window(chars: &[char], start: usize, end: usize) -> ContextWindow {
    ContextWindow {
        text: chars[start..end].iter().collect(),
        start_offset: start,
        end_offset: end,
    }
}
