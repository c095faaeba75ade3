//! Reading session.
//!
//! A [`Session`] pairs a shared, immutable [`BibleIndex`] with the one piece
//! of mutable state the reader has: the current position. Every change of
//! position is validated against the index and announced to observers.

use std::sync::Arc;

use crate::bible::index::{BibleIndex, Passage};
use crate::error::{Error, Result};
use crate::services::location::SavedLocation;
use crate::services::observer::{PassageChange, PassageObserver};
use crate::types::{BookKey, Position, Scope, ScopeKind};

/// The currently resolved passage.
#[derive(Debug, Clone, Copy)]
pub struct CurrentPassage<'a> {
    /// Where the session stands.
    pub position: &'a Position,
    /// Passage at that position.
    pub passage: &'a Passage,
}

/// Outcome of the last keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    /// Query as typed.
    pub query: String,
    /// Scope the query actually ran in.
    pub scope: Scope,
    /// Matching positions in canonical order.
    pub hits: Vec<Position>,
}

/// Reader state over one index.
pub struct Session {
    index: Arc<BibleIndex>,
    position: Option<Position>,
    results: Option<SearchResults>,
    observers: Vec<Box<dyn PassageObserver>>,
}

impl Session {
    /// Start a session with no passage selected.
    pub fn new(index: Arc<BibleIndex>) -> Self {
        Self {
            index,
            position: None,
            results: None,
            observers: Vec::new(),
        }
    }

    /// The index this session reads.
    pub fn index(&self) -> &BibleIndex {
        &self.index
    }

    /// Current position, if a passage is selected.
    pub const fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Current position with its passage.
    pub fn current_passage(&self) -> Option<CurrentPassage<'_>> {
        let position = self.position.as_ref()?;
        let passage = self.index.passage_at(position)?;
        Some(CurrentPassage { position, passage })
    }

    /// Register an observer; it is not notified until the next change.
    pub fn subscribe(&mut self, observer: Box<dyn PassageObserver>) {
        tracing::debug!("Observer {} subscribed", observer.name());
        self.observers.push(observer);
    }

    /// Move to `position` if it holds a passage.
    pub fn go_to(&mut self, position: Position) -> Result<()> {
        self.index.resolve(&position)?;
        self.position = Some(position);
        self.notify();
        Ok(())
    }

    /// Parse `input` as a reference and move there.
    pub fn go_to_reference(&mut self, input: &str) -> Result<Position> {
        let (position, _) = self.index.lookup(input)?;
        self.go_to(position.clone())?;
        Ok(position)
    }

    /// Move to the first stored verse of `book chapter`.
    pub fn go_to_chapter(&mut self, book: &BookKey, chapter: u32) -> Result<Position> {
        let verse = self
            .index
            .first_verse(book, chapter)
            .ok_or_else(|| Error::NotFound(format!("{book} {chapter}")))?;
        let position = Position::new(book.clone(), chapter, verse);
        self.go_to(position.clone())?;
        Ok(position)
    }

    /// Deselect the current passage.
    pub fn clear(&mut self) {
        self.position = None;
        self.notify();
    }

    /// Step forward; the session stays put at the end of the corpus.
    pub fn next(&mut self) -> Option<Position> {
        let target = self.index.next(self.position.as_ref()?)?;
        self.position = Some(target.clone());
        self.notify();
        Some(target)
    }

    /// Step back; the session stays put at the start of the corpus.
    pub fn previous(&mut self) -> Option<Position> {
        let target = self.index.previous(self.position.as_ref()?)?;
        self.position = Some(target.clone());
        self.notify();
        Some(target)
    }

    /// Move to a persisted location after checking it against the index.
    pub fn restore(&mut self, saved: &SavedLocation) -> Result<Position> {
        let position = Position::new(BookKey::new(&saved.book), saved.chapter, saved.verse);
        self.go_to(position.clone())?;
        tracing::info!("Restored last location {position}");
        Ok(position)
    }

    /// Run a keyword search in a scope relative to the current position.
    ///
    /// Book and chapter scopes fall back to the whole corpus when no passage
    /// is selected.
    pub fn search(&mut self, query: &str, kind: ScopeKind) -> &SearchResults {
        let scope = self.resolve_scope(kind);
        let hits = self
            .index
            .search(query, &scope)
            .into_iter()
            .map(|hit| hit.position)
            .collect();
        self.results.insert(SearchResults {
            query: query.trim().to_string(),
            scope,
            hits,
        })
    }

    /// Results of the last search, until cleared.
    pub const fn search_results(&self) -> Option<&SearchResults> {
        self.results.as_ref()
    }

    /// Leave search results mode.
    pub fn clear_search(&mut self) {
        self.results = None;
    }

    /// Re-announce the current state to every observer.
    pub fn refresh(&mut self) {
        self.notify();
    }

    /// Swap in a rebuilt index, keeping the position only if it still resolves.
    pub fn replace_index(&mut self, index: Arc<BibleIndex>) {
        self.index = index;
        self.results = None;
        if let Some(position) = &self.position {
            if self.index.passage_at(position).is_none() {
                tracing::warn!("Position {position} no longer exists after reload");
                self.position = None;
            }
        }
        self.notify();
    }

    fn resolve_scope(&self, kind: ScopeKind) -> Scope {
        match (kind, &self.position) {
            (ScopeKind::Corpus, _) => Scope::Corpus,
            (ScopeKind::Book, Some(p)) => Scope::Book(p.book.clone()),
            (ScopeKind::Chapter, Some(p)) => Scope::Chapter(p.book.clone(), p.chapter),
            (kind, None) => {
                tracing::debug!("No current passage; searching whole corpus instead of {kind:?}");
                Scope::Corpus
            }
        }
    }

    fn notify(&mut self) {
        let change = match &self.position {
            Some(position) => self
                .index
                .passage_at(position)
                .map_or_else(PassageChange::cleared, |passage| PassageChange::resolved(position, passage)),
            None => PassageChange::cleared(),
        };
        for observer in &mut self.observers {
            observer.passage_changed(&change);
        }
    }
}
