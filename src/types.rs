//! Core type definitions for compile-time safety.
//!
//! Book keys, positions and search scopes are small value types passed by
//! reference into the index; the index never hands out mutable access to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bible::reference::normalize_book_name;
use crate::error::Error;

/// Normalized book identifier (trimmed, lower-cased, single-spaced).
///
/// The only way to build one is through normalization, so a `BookKey` read
/// from the dataset and one typed by a user compare equal whenever their
/// names differ only in casing or spacing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BookKey(String);

impl BookKey {
    /// Normalize a raw book name into a key.
    pub fn new(raw: &str) -> Self {
        Self(normalize_book_name(raw))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BookKey {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for BookKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<BookKey> for String {
    fn from(key: BookKey) -> Self {
        key.0
    }
}

impl AsRef<str> for BookKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A `(book, chapter, verse)` location in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Normalized book key.
    pub book: BookKey,
    /// Chapter number.
    pub chapter: u32,
    /// Verse number.
    pub verse: u32,
}

impl Position {
    /// Create a position from its parts.
    pub const fn new(book: BookKey, chapter: u32, verse: u32) -> Self {
        Self { book, chapter, verse }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Restriction applied to a keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every indexed passage.
    Corpus,
    /// Passages of one book.
    Book(BookKey),
    /// Passages of one chapter of one book.
    Chapter(BookKey, u32),
}

impl Scope {
    /// Whether a passage at `book`/`chapter` falls inside this scope.
    pub fn contains(&self, book: &BookKey, chapter: u32) -> bool {
        match self {
            Self::Corpus => true,
            Self::Book(key) => key == book,
            Self::Chapter(key, ch) => key == book && *ch == chapter,
        }
    }
}

/// Scope choice as offered to the user, resolved against the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeKind {
    /// Search the whole corpus.
    #[default]
    Corpus,
    /// Search the current book.
    Book,
    /// Search the current chapter.
    Chapter,
}

impl ScopeKind {
    /// Returns the human-readable name of this scope.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Corpus => "Whole Bible",
            Self::Book => "Current book",
            Self::Chapter => "Current chapter",
        }
    }

    /// Cycle to next scope (for 's' key).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Corpus => Self::Book,
            Self::Book => Self::Chapter,
            Self::Chapter => Self::Corpus,
        }
    }
}

impl FromStr for ScopeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "corpus" | "bible" | "all" => Ok(Self::Corpus),
            "book" => Ok(Self::Book),
            "chapter" => Ok(Self::Chapter),
            other => Err(Error::Msg(format!(
                "unknown search scope {other:?} (expected corpus, book or chapter)"
            ))),
        }
    }
}
