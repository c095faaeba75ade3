//! Verse-by-verse traversal.
//!
//! Stepping crosses chapter boundaries inside a book and book boundaries in
//! canonical order. The verse-count table decides where a chapter ends; the
//! computed target must still have a stored passage or the step fails.

use crate::bible::index::BibleIndex;
use crate::types::Position;

impl BibleIndex {
    /// Position after `position`, or `None` at the end of the corpus.
    pub fn next(&self, position: &Position) -> Option<Position> {
        let slot = self.book_position(&position.book)?;
        let meta = self.book_meta(&position.book)?;
        let chapters = meta.chapters();
        let chapter_idx = chapters.binary_search(&position.chapter).ok()?;
        let last_verse = meta.verse_count(position.chapter)?;

        let target = if position.verse < last_verse {
            Position::new(position.book.clone(), position.chapter, position.verse + 1)
        } else if let Some(&chapter) = chapters.get(chapter_idx + 1) {
            Position::new(position.book.clone(), chapter, 1)
        } else {
            let book = self.book_at(slot + 1)?;
            let chapter = self.book_meta(book)?.first_chapter()?;
            Position::new(book.clone(), chapter, 1)
        };

        self.checked(target)
    }

    /// Position before `position`, or `None` at the start of the corpus.
    pub fn previous(&self, position: &Position) -> Option<Position> {
        let slot = self.book_position(&position.book)?;
        let meta = self.book_meta(&position.book)?;
        let chapters = meta.chapters();
        let chapter_idx = chapters.binary_search(&position.chapter).ok()?;

        let target = if position.verse > 1 {
            Position::new(position.book.clone(), position.chapter, position.verse - 1)
        } else if chapter_idx > 0 {
            let chapter = chapters[chapter_idx - 1];
            Position::new(position.book.clone(), chapter, meta.verse_count(chapter)?)
        } else {
            let book = self.book_at(slot.checked_sub(1)?)?;
            let prev_meta = self.book_meta(book)?;
            let chapter = prev_meta.last_chapter()?;
            Position::new(book.clone(), chapter, prev_meta.verse_count(chapter)?)
        };

        self.checked(target)
    }

    fn checked(&self, target: Position) -> Option<Position> {
        if self.passage_at(&target).is_some() {
            Some(target)
        } else {
            tracing::debug!("Traversal target {target} has no stored passage");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::dataset::RawEntry;
    use crate::types::BookKey;

    fn index(keys: &[&str]) -> BibleIndex {
        BibleIndex::build(keys.iter().map(|k| RawEntry::new(*k, format!("text of {k}"), Some(k))))
    }

    fn pos(book: &str, chapter: u32, verse: u32) -> Position {
        Position::new(BookKey::new(book), chapter, verse)
    }

    #[test]
    fn test_next_within_chapter() {
        let idx = index(&["Ruth 1:1", "Ruth 1:2", "Ruth 1:3"]);
        assert_eq!(idx.next(&pos("ruth", 1, 1)), Some(pos("ruth", 1, 2)));
    }

    #[test]
    fn test_next_crosses_chapter_then_book() {
        let idx = index(&["Ruth 3:1", "Ruth 3:2", "Ruth 3:3", "Ruth 4:1", "Esther 1:1"]);
        assert_eq!(idx.next(&pos("ruth", 3, 3)), Some(pos("ruth", 4, 1)));
        assert_eq!(idx.next(&pos("ruth", 4, 1)), Some(pos("esther", 1, 1)));
        assert_eq!(idx.next(&pos("esther", 1, 1)), None);
    }

    #[test]
    fn test_next_uses_book_order_not_alphabet() {
        let idx = index(&["Zechariah 1:1", "Amos 1:1"]);
        assert_eq!(idx.next(&pos("zechariah", 1, 1)), Some(pos("amos", 1, 1)));
        assert_eq!(idx.previous(&pos("amos", 1, 1)), Some(pos("zechariah", 1, 1)));
    }

    #[test]
    fn test_previous_crosses_chapter_then_book() {
        let idx = index(&["Ruth 4:22", "Ruth 4:21", "Esther 1:1", "Esther 2:1", "Esther 2:2"]);
        assert_eq!(idx.previous(&pos("esther", 2, 1)), Some(pos("esther", 1, 1)));
        assert_eq!(idx.previous(&pos("esther", 1, 1)), Some(pos("ruth", 4, 22)));
        assert_eq!(idx.previous(&pos("ruth", 4, 21)), None);
    }

    #[test]
    fn test_gap_fails_instead_of_dangling() {
        // chapter 1 has verses 1 and 3; verse count says 3
        let idx = index(&["Jude 1:1", "Jude 1:3"]);
        assert_eq!(idx.next(&pos("jude", 1, 1)), None);
        assert_eq!(idx.previous(&pos("jude", 1, 3)), None);
    }

    #[test]
    fn test_chapter_not_starting_at_verse_one() {
        let idx = index(&["Mark 1:1", "Mark 2:2", "Mark 2:3"]);
        assert_eq!(idx.next(&pos("mark", 1, 1)), None);
        assert_eq!(idx.previous(&pos("mark", 2, 2)), None);
        assert_eq!(idx.next(&pos("mark", 2, 2)), Some(pos("mark", 2, 3)));
    }

    #[test]
    fn test_unknown_book_or_chapter() {
        let idx = index(&["Ruth 1:1", "Ruth 1:2"]);
        assert_eq!(idx.next(&pos("naomi", 1, 1)), None);
        assert_eq!(idx.next(&pos("ruth", 7, 1)), None);
        assert_eq!(idx.previous(&pos("ruth", 7, 1)), None);
    }

    #[test]
    fn test_round_trip() {
        let idx = index(&["Ruth 1:1", "Ruth 1:2", "Ruth 2:1", "Esther 1:1", "Esther 1:2"]);
        let mut cursor = idx.first_position().unwrap();
        while let Some(next) = idx.next(&cursor) {
            assert_eq!(idx.previous(&next).as_ref(), Some(&cursor));
            cursor = next;
        }
        assert_eq!(Some(cursor), idx.last_position());
    }
}
