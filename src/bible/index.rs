//! Structured corpus index.
//!
//! Built once from the raw dataset: books in first-seen order, each with its
//! metadata and a chapter -> verse -> passage map. Nothing mutates the index
//! after [`BibleIndex::build`] returns.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::bible::dataset::{RawDataset, RawEntry};
use crate::bible::reference::{capitalize_words, format_reference, parse_reference, split_reference};
use crate::error::{Error, Result};
use crate::types::{BookKey, Position};

/// A single addressable unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    text: String,
    reference: String,
    /// Lowercased text for case-insensitive search.
    text_lower: String,
}

impl Passage {
    /// Create a passage, precomputing its search form.
    pub fn new(text: impl Into<String>, reference: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text_lower: text.to_lowercase(),
            text,
            reference: reference.into(),
        }
    }

    /// Passage body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display reference, e.g. `"John 3:16"`.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub(crate) fn text_lower(&self) -> &str {
        &self.text_lower
    }
}

/// Per-book metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMeta {
    display_name: String,
    chapters: Vec<u32>,
    verse_counts: BTreeMap<u32, u32>,
}

impl BookMeta {
    /// Name shown to users, e.g. `"Song of Solomon"`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Chapter numbers in ascending order.
    pub fn chapters(&self) -> &[u32] {
        &self.chapters
    }

    /// Highest verse number seen in `chapter`.
    pub fn verse_count(&self, chapter: u32) -> Option<u32> {
        self.verse_counts.get(&chapter).copied()
    }

    /// First chapter of the book.
    pub fn first_chapter(&self) -> Option<u32> {
        self.chapters.first().copied()
    }

    /// Last chapter of the book.
    pub fn last_chapter(&self) -> Option<u32> {
        self.chapters.last().copied()
    }
}

/// Counters describing what happened while indexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Passages stored.
    pub indexed: usize,
    /// Entries whose key did not parse.
    pub skipped_keys: usize,
    /// Entries that replaced an earlier entry with the same triple.
    pub overwritten: usize,
    /// Distinct raw book names merged into an existing book key.
    pub merged_names: usize,
}

#[derive(Debug)]
pub(crate) struct BookEntry {
    pub(crate) key: BookKey,
    pub(crate) meta: BookMeta,
    pub(crate) chapters: BTreeMap<u32, BTreeMap<u32, Passage>>,
}

/// Navigable index over the whole corpus.
#[derive(Debug)]
pub struct BibleIndex {
    /// Books in first-seen dataset order.
    books: Vec<BookEntry>,
    slots: HashMap<BookKey, usize>,
    stats: IndexStats,
}

/// Bookkeeping that only lives while the index is being built.
struct Builder {
    index: BibleIndex,
    first_raw_name: HashMap<BookKey, String>,
    reported_merges: HashSet<(BookKey, String)>,
}

impl Builder {
    fn new() -> Self {
        Self {
            index: BibleIndex {
                books: Vec::new(),
                slots: HashMap::new(),
                stats: IndexStats::default(),
            },
            first_raw_name: HashMap::new(),
            reported_merges: HashSet::new(),
        }
    }

    fn ingest(&mut self, entry: RawEntry) {
        let Some(raw) = split_reference(&entry.key) else {
            tracing::debug!("Skipping dataset entry with unparsable key {:?}", entry.key);
            self.index.stats.skipped_keys += 1;
            return;
        };
        let book_key = BookKey::new(raw.book);
        let (chapter, verse) = (raw.chapter, raw.verse);

        let slot = match self.index.slots.get(&book_key) {
            Some(&slot) => {
                self.check_merge(&book_key, raw.book);
                slot
            }
            None => self.open_book(book_key.clone(), raw.book, entry.reference.as_deref()),
        };

        let book = &mut self.index.books[slot];
        let reference = entry
            .reference
            .unwrap_or_else(|| format_reference(&book.meta.display_name, chapter, verse));
        let previous = book
            .chapters
            .entry(chapter)
            .or_default()
            .insert(verse, Passage::new(entry.text, reference));

        if previous.is_some() {
            tracing::warn!("Duplicate passage {book_key} {chapter}:{verse}; keeping the later entry");
            self.index.stats.overwritten += 1;
        } else {
            self.index.stats.indexed += 1;
        }

        let count = book.meta.verse_counts.entry(chapter).or_insert(0);
        *count = (*count).max(verse);
    }

    fn open_book(&mut self, key: BookKey, raw_book: &str, reference: Option<&str>) -> usize {
        // Display name comes from the reference prefix, e.g. "Song of Solomon 1:1".
        let display_name = reference
            .and_then(split_reference)
            .map_or_else(|| capitalize_words(raw_book), |r| r.book.to_string());

        let slot = self.index.books.len();
        self.index.books.push(BookEntry {
            key: key.clone(),
            meta: BookMeta {
                display_name,
                chapters: Vec::new(),
                verse_counts: BTreeMap::new(),
            },
            chapters: BTreeMap::new(),
        });
        self.index.slots.insert(key.clone(), slot);
        self.first_raw_name.insert(key, raw_book.to_string());
        slot
    }

    fn check_merge(&mut self, key: &BookKey, raw_book: &str) {
        let Some(first) = self.first_raw_name.get(key) else {
            return;
        };
        if first == raw_book {
            return;
        }
        if self.reported_merges.insert((key.clone(), raw_book.to_string())) {
            tracing::warn!(
                book = %key,
                first = %first,
                other = %raw_book,
                "Distinct book names normalize to the same key; merging into one book"
            );
            self.index.stats.merged_names += 1;
        }
    }

    fn finish(mut self) -> BibleIndex {
        for book in &mut self.index.books {
            book.meta.chapters = book.chapters.keys().copied().collect();
        }
        self.index
    }
}

impl BibleIndex {
    /// Index `entries` in the order given.
    ///
    /// Entries whose key does not follow the reference grammar are skipped.
    /// A repeated `(book, chapter, verse)` keeps the later entry.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let mut builder = Builder::new();
        for entry in entries {
            builder.ingest(entry);
        }
        builder.finish()
    }

    /// Index a parsed dataset.
    pub fn from_dataset(dataset: RawDataset) -> Self {
        Self::build(dataset.into_entries())
    }

    /// Indexing counters.
    pub const fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Number of stored passages.
    pub fn len(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.values())
            .map(BTreeMap::len)
            .sum()
    }

    /// Whether the index holds no passages.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Book keys in canonical order.
    pub fn book_order(&self) -> impl Iterator<Item = &BookKey> + '_ {
        self.books.iter().map(|b| &b.key)
    }

    /// Books with their metadata, in canonical order.
    pub fn books(&self) -> impl Iterator<Item = (&BookKey, &BookMeta)> + '_ {
        self.books.iter().map(|b| (&b.key, &b.meta))
    }

    /// Number of books.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Metadata for one book.
    pub fn book_meta(&self, book: &BookKey) -> Option<&BookMeta> {
        self.entry(book).map(|b| &b.meta)
    }

    /// Position of `book` in the canonical order.
    pub fn book_position(&self, book: &BookKey) -> Option<usize> {
        self.slots.get(book).copied()
    }

    /// Book key at `slot` in the canonical order.
    pub fn book_at(&self, slot: usize) -> Option<&BookKey> {
        self.books.get(slot).map(|b| &b.key)
    }

    /// Stored passage at `book chapter:verse`.
    pub fn passage(&self, book: &BookKey, chapter: u32, verse: u32) -> Option<&Passage> {
        self.entry(book)?.chapters.get(&chapter)?.get(&verse)
    }

    /// Stored passage at `position`.
    pub fn passage_at(&self, position: &Position) -> Option<&Passage> {
        self.passage(&position.book, position.chapter, position.verse)
    }

    /// Like [`Self::passage_at`] but reports a missing passage as [`Error::NotFound`].
    pub fn resolve(&self, position: &Position) -> Result<&Passage> {
        self.passage_at(position)
            .ok_or_else(|| Error::not_found(position.book.as_str(), position.chapter, position.verse))
    }

    /// Parse a free-text reference and resolve it.
    pub fn lookup(&self, input: &str) -> Result<(Position, &Passage)> {
        let position =
            parse_reference(input).ok_or_else(|| Error::InvalidReference(input.trim().to_string()))?;
        let passage = self.resolve(&position)?;
        Ok((position, passage))
    }

    /// Verses of one chapter in ascending order.
    pub fn chapter_verses(&self, book: &BookKey, chapter: u32) -> impl Iterator<Item = (u32, &Passage)> + '_ {
        self.entry(book)
            .and_then(|b| b.chapters.get(&chapter))
            .into_iter()
            .flat_map(|verses| verses.iter().map(|(v, p)| (*v, p)))
    }

    /// Lowest stored verse number of a chapter.
    pub fn first_verse(&self, book: &BookKey, chapter: u32) -> Option<u32> {
        self.entry(book)?.chapters.get(&chapter)?.keys().next().copied()
    }

    /// First passage of the corpus.
    pub fn first_position(&self) -> Option<Position> {
        let book = self.books.first()?;
        let (&chapter, verses) = book.chapters.iter().next()?;
        let &verse = verses.keys().next()?;
        Some(Position::new(book.key.clone(), chapter, verse))
    }

    /// Last passage of the corpus.
    pub fn last_position(&self) -> Option<Position> {
        let book = self.books.last()?;
        let (&chapter, verses) = book.chapters.iter().next_back()?;
        let &verse = verses.keys().next_back()?;
        Some(Position::new(book.key.clone(), chapter, verse))
    }

    /// Display names starting with `prefix` (case-insensitive), in canonical order.
    pub fn suggest_books(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim_start().to_lowercase();
        self.books
            .iter()
            .map(|b| b.meta.display_name.as_str())
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .collect()
    }

    pub(crate) fn entry(&self, book: &BookKey) -> Option<&BookEntry> {
        self.slots.get(book).and_then(|&slot| self.books.get(slot))
    }

    pub(crate) fn entries(&self) -> &[BookEntry] {
        &self.books
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn entry(key: &str, text: &str) -> RawEntry {
        RawEntry::new(key, text, Some(key))
    }

    #[test]
    fn test_book_order_is_first_seen() {
        let index = BibleIndex::build(vec![
            entry("Matthew 1:1", "m"),
            entry("Genesis 1:1", "g"),
            entry("Matthew 1:2", "m2"),
            entry("Exodus 1:1", "e"),
        ]);
        let order: Vec<&str> = index.book_order().map(BookKey::as_str).collect();
        assert_eq!(order, ["matthew", "genesis", "exodus"]);
        assert_eq!(index.book_position(&BookKey::new("Genesis")), Some(1));
    }

    #[test]
    fn test_chapters_sorted_and_verse_counts_are_max() {
        let index = BibleIndex::build(vec![
            entry("Ruth 4:22", "last"),
            entry("Ruth 1:2", "b"),
            entry("Ruth 1:1", "a"),
            entry("Ruth 2:5", "gap"),
        ]);
        let meta = index.book_meta(&BookKey::new("ruth")).unwrap();
        assert_eq!(meta.chapters(), [1, 2, 4]);
        assert_eq!(meta.verse_count(1), Some(2));
        assert_eq!(meta.verse_count(2), Some(5));
        assert_eq!(meta.verse_count(3), None);
        assert_eq!(index.first_verse(&BookKey::new("ruth"), 2), Some(5));
    }

    #[test]
    fn test_display_name_from_reference_or_capitalized() {
        let index = BibleIndex::build(vec![
            RawEntry::new("song of solomon 1:1", "s", Some("Song of Solomon 1:1")),
            RawEntry::new("1 john 1:1", "j", None),
            RawEntry::new("jude 1:1", "d", Some("The Epistle of Jude")),
        ]);
        let name = |k: &str| index.book_meta(&BookKey::new(k)).unwrap().display_name().to_string();
        assert_eq!(name("song of solomon"), "Song of Solomon");
        assert_eq!(name("1 john"), "1 John");
        assert_eq!(name("jude"), "Jude");
        let passage = index.passage(&BookKey::new("1 john"), 1, 1).unwrap();
        assert_eq!(passage.reference(), "1 John 1:1");
    }

    #[test]
    fn test_malformed_keys_skipped() {
        let index = BibleIndex::build(vec![
            entry("Preface", "not a verse"),
            entry("Genesis 1", "no verse"),
            entry("Genesis 1:1", "In the beginning"),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.stats().skipped_keys, 2);
        assert_eq!(index.book_count(), 1);
    }

    #[test]
    fn test_duplicate_triple_last_write_wins() {
        let index = BibleIndex::build(vec![entry("Jonah 1:1", "first"), entry("Jonah 1:1", "second")]);
        assert_eq!(index.passage(&BookKey::new("jonah"), 1, 1).unwrap().text(), "second");
        assert_eq!(index.len(), 1);
        assert_eq!(index.stats().overwritten, 1);
    }

    #[test]
    fn test_name_merge_is_detected() {
        let index = BibleIndex::build(vec![
            entry("Song of Solomon 1:1", "a"),
            entry("Song of  solomon 1:2", "b"),
            entry("Song of  solomon 1:3", "c"),
            entry("SONG OF SOLOMON 1:4", "d"),
        ]);
        assert_eq!(index.book_count(), 1);
        assert_eq!(index.stats().merged_names, 2);
        let meta = index.book_meta(&BookKey::new("song of solomon")).unwrap();
        assert_eq!(meta.display_name(), "Song of Solomon");
        assert_eq!(meta.verse_count(1), Some(4));
    }

    #[test]
    fn test_lookup_reports_parse_and_missing() {
        let index = BibleIndex::build(vec![entry("John 3:16", "For God so loved the world")]);
        let (pos, passage) = index.lookup("JOHN 3:16").unwrap();
        assert_eq!(pos, Position::new(BookKey::new("john"), 3, 16));
        assert_eq!(passage.text(), "For God so loved the world");
        assert!(matches!(index.lookup("John"), Err(Error::InvalidReference(_))));
        assert!(matches!(index.lookup("John 3:17"), Err(Error::NotFound(_))));
        assert!(matches!(index.lookup("Jn 3:16"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_first_last_and_chapter_verses() {
        let index = BibleIndex::build(vec![
            entry("Obadiah 1:2", "b"),
            entry("Obadiah 1:1", "a"),
            entry("Jude 1:25", "z"),
        ]);
        assert_eq!(index.first_position(), Some(Position::new(BookKey::new("obadiah"), 1, 1)));
        assert_eq!(index.last_position(), Some(Position::new(BookKey::new("jude"), 1, 25)));
        let verses: Vec<u32> = index.chapter_verses(&BookKey::new("obadiah"), 1).map(|(v, _)| v).collect();
        assert_eq!(verses, [1, 2]);
        assert_eq!(index.chapter_verses(&BookKey::new("obadiah"), 2).count(), 0);
    }

    #[test]
    fn test_suggest_books() {
        let index = BibleIndex::build(vec![
            entry("John 1:1", "a"),
            entry("Joel 1:1", "b"),
            entry("1 John 1:1", "c"),
            entry("Jonah 1:1", "d"),
        ]);
        assert_eq!(index.suggest_books("jo"), ["John", "Joel", "Jonah"]);
        assert_eq!(index.suggest_books("1 "), ["1 John"]);
        assert!(index.suggest_books("x").is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = BibleIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.first_position(), None);
        assert_eq!(index.len(), 0);
    }
}
