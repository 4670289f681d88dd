//! Canonical book table (the reference mapper).
//!
//! The 66 books of the Protestant canon in canonical order, Genesis through
//! Revelation. A book's identifier is its 0-based position in [`BOOKS`];
//! the per-translation verse tables key rows by this identifier.
//!
//! Forward lookup ([`book_id`]) is case-insensitive but otherwise exact:
//! `"song of solomon"` resolves, `"song of  solomon"` and `"1john"` do not.
//!
//! # Example
//!
//! ```rust
//! use lectio_core::books::{book_id, canonical_name};
//!
//! assert_eq!(book_id("JOHN"), Some(42));
//! assert_eq!(canonical_name(61), Some("1 John"));
//! assert_eq!(book_id("Xyzzy"), None);
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Number of books in the canonical table.
pub const BOOK_COUNT: usize = 66;

/// Display names in canonical order. Index = book identifier.
pub const BOOKS: [&str; BOOK_COUNT] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Resolve a book name to its canonical identifier, ignoring case.
///
/// Returns `None` for anything that is not exactly one of the 66 names.
pub fn book_id(name: &str) -> Option<u32> {
    BOOKS
        .iter()
        .position(|b| b.eq_ignore_ascii_case(name))
        .map(|i| i as u32)
}

/// Display name for a canonical identifier.
pub fn canonical_name(id: u32) -> Option<&'static str> {
    BOOKS.get(id as usize).copied()
}

/// Serializes as `{"genesis": 0, "exodus": 1, ...}` in canonical order.
///
/// Sent to clients as `bookData` so they can map names to identifiers
/// without a second request.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookIds;

impl Serialize for BookIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BOOK_COUNT))?;
        for (i, name) in BOOKS.iter().enumerate() {
            map.serialize_entry(&name.to_lowercase(), &i)?;
        }
        map.end()
    }
}

/// Serializes as `{"genesis": "Genesis", ...}` in canonical order (`displayBookData`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayNames;

impl Serialize for DisplayNames {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BOOK_COUNT))?;
        for name in BOOKS.iter() {
            map.serialize_entry(&name.to_lowercase(), name)?;
        }
        map.end()
    }
}
