//! Scripture reference grammar.
//!
//! A reference is `<book name> <chapter>:<verse>`. The grammar is anchored to
//! the end of the input: the book name is everything before the last
//! `<digits>:<digits>`, so numbered books such as `1 John 3:16` parse with
//! book `1 John`. Dataset keys and user input go through the same regex.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BookKey, Position};

/// Regex matching `<book> <chapter>:<verse>` with optional surrounding whitespace.
#[allow(clippy::expect_used)]
static RE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s+([0-9]+):([0-9]+)\s*$").expect("valid regex: RE_REFERENCE")
});

/// A reference split into its parts, book name not yet normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReference<'a> {
    /// Book name exactly as written (without surrounding whitespace).
    pub book: &'a str,
    /// Chapter number (positive).
    pub chapter: u32,
    /// Verse number (positive).
    pub verse: u32,
}

impl RawReference<'_> {
    /// Normalize the book name and produce a position.
    pub fn to_position(&self) -> Position {
        Position::new(BookKey::new(self.book), self.chapter, self.verse)
    }
}

/// Split `text` into raw book name, chapter and verse.
///
/// Returns `None` when the pattern is absent, the book name is blank, or the
/// chapter or verse is zero or does not fit in a `u32`.
pub fn split_reference(text: &str) -> Option<RawReference<'_>> {
    let caps = RE_REFERENCE.captures(text)?;
    let book = caps.get(1)?.as_str().trim();
    if book.is_empty() {
        return None;
    }
    let chapter = parse_positive(caps.get(2)?.as_str())?;
    let verse = parse_positive(caps.get(3)?.as_str())?;
    Some(RawReference { book, chapter, verse })
}

/// Parse a reference like `"john 3:16"` or `"1 John 3:16"` into a normalized position.
pub fn parse_reference(input: &str) -> Option<Position> {
    split_reference(input).map(|raw| raw.to_position())
}

/// Normalize a book name: trim, lower-case, collapse whitespace runs to one space.
pub fn normalize_book_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize each word: `"song of SOLOMON"` becomes `"Song Of Solomon"`.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a display reference such as `"John 3:16"`.
pub fn format_reference(display_name: &str, chapter: u32, verse: u32) -> String {
    format!("{display_name} {chapter}:{verse}")
}

fn parse_positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_parse_simple_ref() {
        let pos = parse_reference("John 3:16").unwrap();
        assert_eq!(pos.book.as_str(), "john");
        assert_eq!(pos.chapter, 3);
        assert_eq!(pos.verse, 16);
    }

    #[test]
    fn test_parse_is_case_and_space_insensitive() {
        assert_eq!(parse_reference("john 3:16"), parse_reference("  JOHN   3:16  "));
    }

    #[test]
    fn test_parse_numbered_book() {
        let pos = parse_reference("1 John 3:1").unwrap();
        assert_eq!(pos.book.as_str(), "1 john");
        assert_eq!((pos.chapter, pos.verse), (3, 1));
    }

    #[test]
    fn test_parse_multi_word_book() {
        let raw = split_reference("Song of   Solomon 2:4").unwrap();
        assert_eq!(raw.book, "Song of   Solomon");
        assert_eq!(raw.to_position().book.as_str(), "song of solomon");
    }

    #[test]
    fn test_book_is_everything_before_last_pair() {
        let raw = split_reference("Weird 1:2 Book 4:5").unwrap();
        assert_eq!(raw.book, "Weird 1:2 Book");
        assert_eq!((raw.chapter, raw.verse), (4, 5));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_reference("").is_none());
        assert!(parse_reference("   ").is_none());
        assert!(parse_reference("John").is_none());
        assert!(parse_reference("John 3").is_none());
        assert!(parse_reference("John three:16").is_none());
        assert!(parse_reference("3:16").is_none());
        assert!(parse_reference("John 3:16-18").is_none());
        assert!(parse_reference("John 3:16a").is_none());
    }

    #[test]
    fn test_parse_rejects_zero_and_overflow() {
        assert!(parse_reference("John 0:16").is_none());
        assert!(parse_reference("John 3:0").is_none());
        assert!(parse_reference("John 99999999999:1").is_none());
    }

    #[test]
    fn test_normalize_book_name() {
        assert_eq!(normalize_book_name("  Song  of\tSolomon "), "song of solomon");
        assert_eq!(normalize_book_name(""), "");
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("song of SOLOMON"), "Song Of Solomon");
        assert_eq!(capitalize_words("1 john"), "1 John");
        assert_eq!(capitalize_words("  "), "");
    }
}
