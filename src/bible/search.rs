//! Keyword search.
//!
//! Plain case-insensitive substring containment over passage text. Results
//! come back in canonical order (book order, then chapter, then verse)
//! because the scan walks the index in that order.

use crate::bible::index::{BibleIndex, Passage};
use crate::types::{Position, Scope};

/// One search match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// Where the passage lives.
    pub position: Position,
    /// The matching passage.
    pub passage: &'a Passage,
}

impl<'a> SearchHit<'a> {
    /// Display reference of the hit, borrowed from the index.
    pub fn reference(&self) -> &'a str {
        self.passage.reference()
    }

    /// Passage text of the hit, borrowed from the index.
    pub fn text(&self) -> &'a str {
        self.passage.text()
    }
}

impl BibleIndex {
    /// Find passages whose text contains `query`, ignoring case.
    ///
    /// A query that is blank after trimming yields no hits and scans nothing.
    pub fn search(&self, query: &str, scope: &Scope) -> Vec<SearchHit<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let books = match scope {
            Scope::Corpus => self.entries(),
            Scope::Book(book) | Scope::Chapter(book, _) => match self.book_position(book) {
                Some(slot) => &self.entries()[slot..=slot],
                None => return Vec::new(),
            },
        };

        let mut hits = Vec::new();
        for book in books {
            for (&chapter, verses) in &book.chapters {
                if !scope.contains(&book.key, chapter) {
                    continue;
                }
                hits.extend(
                    verses
                        .iter()
                        .filter(|(_, passage)| passage.text_lower().contains(&needle))
                        .map(|(&verse, passage)| SearchHit {
                            position: Position::new(book.key.clone(), chapter, verse),
                            passage,
                        }),
                );
            }
        }

        tracing::debug!("Search {needle:?} in {scope:?} matched {} passages", hits.len());
        hits
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::dataset::RawEntry;
    use crate::types::BookKey;

    fn sample() -> BibleIndex {
        BibleIndex::build(vec![
            RawEntry::new("John 3:17", "God sent not his Son to condemn", Some("John 3:17")),
            RawEntry::new("John 3:16", "For God so LOVED the world", Some("John 3:16")),
            RawEntry::new("Genesis 1:1", "In the beginning God created", Some("Genesis 1:1")),
            RawEntry::new("John 15:13", "Greater love hath no man", Some("John 15:13")),
            RawEntry::new("1 John 4:8", "God is love", Some("1 John 4:8")),
            RawEntry::new("Romans 5:15", "the grace of God", Some("Romans 5:15")),
            RawEntry::new("Romans 6:1", "that grace may abound", Some("Romans 6:1")),
        ])
    }

    fn refs(hits: &[SearchHit<'_>]) -> Vec<String> {
        hits.iter().map(|h| h.reference().to_string()).collect()
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let index = sample();
        assert!(index.search("", &Scope::Corpus).is_empty());
        assert!(index.search("   ", &Scope::Corpus).is_empty());
    }

    #[test]
    fn test_case_insensitive_substring() {
        let index = sample();
        let hits = index.search("Love", &Scope::Corpus);
        assert_eq!(refs(&hits), ["John 3:16", "John 15:13", "1 John 4:8"]);
        assert_eq!(refs(&index.search("RACE", &Scope::Corpus)), ["Romans 5:15", "Romans 6:1"]);
    }

    #[test]
    fn test_canonical_order_not_scan_order() {
        let index = sample();
        let hits = index.search("god", &Scope::Corpus);
        // John was seen first, so it sorts before Genesis
        assert_eq!(
            refs(&hits),
            ["John 3:16", "John 3:17", "Genesis 1:1", "1 John 4:8", "Romans 5:15"]
        );
    }

    #[test]
    fn test_book_scope() {
        let index = sample();
        let hits = index.search("love", &Scope::Book(BookKey::new("john")));
        assert_eq!(refs(&hits), ["John 3:16", "John 15:13"]);
        assert!(hits.iter().all(|h| h.position.book.as_str() == "john"));
    }

    #[test]
    fn test_chapter_scope_requires_book_and_chapter() {
        let index = sample();
        let hits = index.search("god", &Scope::Chapter(BookKey::new("john"), 3));
        assert_eq!(refs(&hits), ["John 3:16", "John 3:17"]);
        assert!(index.search("grace", &Scope::Chapter(BookKey::new("romans"), 3)).is_empty());
    }

    #[test]
    fn test_hit_strings_outlive_hits() {
        let index = sample();
        let texts: Vec<&str> = index.search("grace", &Scope::Corpus).iter().map(|h| h.text()).collect();
        let references: Vec<&str> = index.search("grace", &Scope::Corpus).iter().map(|h| h.reference()).collect();
        assert_eq!(texts, ["the grace of God", "that grace may abound"]);
        assert_eq!(references, ["Romans 5:15", "Romans 6:1"]);
    }

    #[test]
    fn test_unknown_book_scope_is_empty() {
        let index = sample();
        assert!(index.search("god", &Scope::Book(BookKey::new("enoch"))).is_empty());
    }
}
