use std::rc::Rc;
use std::sync::Arc;

use arboard::Clipboard;
use crossterm::event::KeyEvent;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::bible::{load_corpus, parse_reference, BibleIndex, Passage};
use crate::config::Config;
use crate::constants::{async_tasks, messages};
use crate::error::{Error, Result};
use crate::input::{dispatch, Action, InputContext, InputMode};
use crate::services::{
    FileLocationStore, LocationRecorder, LocationStore, PresenterFeed, Session, SharedDisplaySize,
};
use crate::types::{BookKey, Position, ScopeKind};

// Messages from background tasks
#[derive(Debug)]
pub enum AppUpdate {
    CorpusLoaded(Result<BibleIndex>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,     // Dataset being read for the first time
    Browse,      // Pickers, verse list and passage
    Presenter,   // Full-screen passage
    Unavailable, // Dataset could not be loaded
}

/// Which picker pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Books,
    Chapters,
    Verses,
}

impl Focus {
    const fn next(self) -> Self {
        match self {
            Self::Books => Self::Chapters,
            Self::Chapters => Self::Verses,
            Self::Verses => Self::Books,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Books => Self::Verses,
            Self::Chapters => Self::Books,
            Self::Verses => Self::Chapters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Reference like `John 3:16`; keyword text falls through to search.
    Keyword,
    /// Reference only.
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

/// One row of the verse list pane.
#[derive(Debug, Clone)]
pub struct VerseRow<'a> {
    pub position: Position,
    pub label: String,
    pub passage: &'a Passage,
}

pub struct App {
    pub mode: AppMode,
    pub focus: Focus,
    pub config: Config,
    pub session: Option<Session>,
    pub book_list_state: ListState,
    pub chapter_list_state: ListState,
    pub verse_list_state: ListState,
    pub selected_book: Option<BookKey>,
    pub selected_chapter: Option<u32>,
    pub prompt: Option<Prompt>,
    pub scope: ScopeKind,
    pub display_size: SharedDisplaySize,
    pub status: String,
    pub error_message: Option<String>,
    pub show_help: bool,
    pub is_loading: bool,
    should_quit: bool,
    async_task_tx: mpsc::Sender<AppUpdate>,
    async_task_rx: mpsc::Receiver<AppUpdate>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (async_task_tx, async_task_rx) = mpsc::channel(async_tasks::CHANNEL_BUFFER_SIZE);
        let display_size = Rc::new(std::cell::Cell::new(config.presenter_size));

        Self {
            mode: AppMode::Loading,
            focus: Focus::Books,
            config,
            session: None,
            book_list_state: ListState::default(),
            chapter_list_state: ListState::default(),
            verse_list_state: ListState::default(),
            selected_book: None,
            selected_chapter: None,
            prompt: None,
            scope: ScopeKind::default(),
            display_size,
            status: messages::LOADING.to_string(),
            error_message: None,
            show_help: false,
            is_loading: false,
            should_quit: false,
            async_task_tx,
            async_task_rx,
        }
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Read and index the dataset on the blocking pool.
    pub fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        self.status = messages::LOADING.to_string();

        let path = self.config.data_path.clone();
        let tx = self.async_task_tx.clone();
        tracing::info!("Loading Bible data from {}", path.display());

        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || load_corpus(&path))
                .await
                .unwrap_or_else(|e| Err(Error::Msg(format!("Loader task failed: {e}"))));
            if tx.send(AppUpdate::CorpusLoaded(result)).await.is_err() {
                tracing::debug!("App closed before the corpus finished loading");
            }
        });
    }

    /// Apply results from background tasks.
    pub fn handle_updates(&mut self) {
        match self.async_task_rx.try_recv() {
            Ok(AppUpdate::CorpusLoaded(result)) => {
                self.is_loading = false;
                match result {
                    Ok(index) => self.install_index(index),
                    Err(e) => self.load_failed(&e),
                }
            }
            Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => {}
        }
    }

    /// Make `index` the live corpus, starting a session on first use.
    pub fn install_index(&mut self, index: BibleIndex) {
        let index = Arc::new(index);
        if let Some(session) = &mut self.session {
            session.replace_index(index);
            tracing::info!("Bible data reloaded");
        } else {
            self.session = Some(self.start_session(index));
        }

        if self.mode != AppMode::Presenter {
            self.mode = AppMode::Browse;
        }
        self.status = messages::READY.to_string();
        self.sync_to_position();
        if self.book_list_state.selected().is_none() {
            self.book_list_state.select(Some(0));
        }
    }

    fn start_session(&self, index: Arc<BibleIndex>) -> Session {
        let mut session = Session::new(index);

        if let Some(path) = &self.config.presenter_feed_path {
            session.subscribe(Box::new(PresenterFeed::new(path.clone(), Rc::clone(&self.display_size))));
        }

        let mut saved = None;
        if let Some(path) = &self.config.location_path {
            let store = FileLocationStore::new(path.clone());
            saved = store.load().unwrap_or_else(|e| {
                tracing::warn!("Ignoring saved location: {e}");
                None
            });
            session.subscribe(Box::new(LocationRecorder::new(store)));
        }

        let restored = saved.is_some_and(|location| match session.restore(&location) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Saved location not usable: {e}");
                false
            }
        });
        if !restored {
            session.refresh();
        }
        session
    }

    fn load_failed(&mut self, error: &Error) {
        tracing::error!("Failed to load Bible data: {error}");
        if self.session.is_some() {
            // Keep reading the previous index
            self.error_message = Some(format!("Reload failed: {error}"));
            self.status = messages::READY.to_string();
        } else {
            self.mode = AppMode::Unavailable;
            self.status = messages::LOAD_FAILED.to_string();
            self.error_message = Some(error.to_string());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.error_message.is_some() {
            self.error_message = None;
            return;
        }

        let ctx = InputContext {
            mode: match self.mode {
                AppMode::Loading | AppMode::Unavailable => InputMode::Waiting,
                AppMode::Browse => InputMode::Browse,
                AppMode::Presenter => InputMode::Presenter,
            },
            show_help: self.show_help,
            prompt_open: self.prompt.is_some(),
        };
        if let Some(action) = dispatch(key, &ctx) {
            self.apply(action);
        }
    }

    /// Perform a user action.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Reload => self.start_loading(),
            Action::NextVerse => self.step(true),
            Action::PreviousVerse => self.step(false),
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrevious => self.focus = self.focus.previous(),
            Action::MoveUp => self.move_selection(false),
            Action::MoveDown => self.move_selection(true),
            Action::Select => self.select(),
            Action::OpenKeywordPrompt => self.open_prompt(PromptKind::Keyword),
            Action::OpenReferencePrompt => self.open_prompt(PromptKind::Reference),
            Action::CycleScope => {
                self.scope = self.scope.next();
                self.status = format!("Search scope: {}", self.scope.name());
            }
            Action::ClearSearch => self.clear_search(),
            Action::TogglePresenter => {
                self.mode = if self.mode == AppMode::Presenter { AppMode::Browse } else { AppMode::Presenter };
            }
            Action::PresenterLarger => self.resize_presenter(true),
            Action::PresenterSmaller => self.resize_presenter(false),
            Action::CopyPassage => self.copy_passage(),
            Action::PromptInput(c) => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.buffer.push(c);
                }
            }
            Action::PromptBackspace => {
                if let Some(prompt) = &mut self.prompt {
                    prompt.buffer.pop();
                }
            }
            Action::PromptComplete => self.complete_book_name(),
            Action::PromptSubmit => self.submit_prompt(),
            Action::PromptCancel => self.prompt = None,
        }
    }

    fn step(&mut self, forward: bool) {
        let Some(session) = &mut self.session else {
            return;
        };
        let moved = if forward { session.next() } else { session.previous() };
        if moved.is_some() {
            self.sync_to_position();
        }
    }

    fn resize_presenter(&mut self, larger: bool) {
        let size = self.display_size.get();
        self.display_size.set(if larger { size.larger() } else { size.smaller() });
        self.status = format!("Presenter size: {}", self.display_size.get().css());
        if let Some(session) = &mut self.session {
            session.refresh();
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            buffer: String::new(),
        });
    }

    fn clear_search(&mut self) {
        if let Some(session) = &mut self.session {
            if session.search_results().is_some() {
                session.clear_search();
                self.status = messages::READY.to_string();
                self.sync_to_position();
            }
        }
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let query = prompt.buffer.trim();
        if query.is_empty() {
            return;
        }

        let as_reference = prompt.kind == PromptKind::Reference || parse_reference(query).is_some();
        if !as_reference {
            self.run_search(query);
            return;
        }
        match self.go_to_reference(query) {
            Ok(()) => {}
            // Keyword input that only looks like a reference is searched instead
            Err(e) if prompt.kind == PromptKind::Keyword && e.is_no_match() => {
                tracing::debug!("{e}; searching for {query:?}");
                self.run_search(query);
            }
            Err(e) => {
                tracing::debug!("Reference lookup failed: {e}");
                self.status = messages::REFERENCE_NOT_FOUND.to_string();
            }
        }
    }

    fn go_to_reference(&mut self, input: &str) -> Result<()> {
        let Some(session) = &mut self.session else {
            return Ok(());
        };
        let position = session.go_to_reference(input)?;
        session.clear_search();
        tracing::debug!("Jumped to {position}");
        self.status = messages::READY.to_string();
        self.focus = Focus::Verses;
        self.sync_to_position();
        Ok(())
    }

    fn run_search(&mut self, query: &str) {
        let Some(session) = &mut self.session else {
            return;
        };
        let results = session.search(query, self.scope);
        let count = results.hits.len();
        self.status = if count == 0 {
            messages::NO_RESULTS.to_string()
        } else {
            format!("{count} result(s) for \"{}\"", results.query)
        };
        tracing::debug!("Search {query:?} in {:?}: {count} hits", results.scope);

        self.focus = Focus::Verses;
        self.verse_list_state.select((count > 0).then_some(0));
    }

    /// Complete the book name typed so far to the longest shared prefix.
    fn complete_book_name(&mut self) {
        let (Some(prompt), Some(session)) = (&mut self.prompt, &self.session) else {
            return;
        };
        // Chapter and verse already typed
        if prompt.buffer.contains(':') {
            return;
        }
        let suggestions = session.index().suggest_books(&prompt.buffer);
        match suggestions.as_slice() {
            [] => self.status = format!("No book starts with \"{}\"", prompt.buffer.trim()),
            [only] => prompt.buffer = format!("{only} "),
            [first, rest @ ..] => {
                let shared = rest.iter().fold(first.to_string(), |acc, name| common_prefix(&acc, name));
                if shared.chars().count() > prompt.buffer.trim_start().chars().count() {
                    prompt.buffer = shared;
                }
                self.status = suggestions.iter().take(6).copied().collect::<Vec<_>>().join(", ");
            }
        }
    }

    fn copy_passage(&mut self) {
        let Some(current) = self.session.as_ref().and_then(Session::current_passage) else {
            self.status = messages::NO_PASSAGE_REFERENCE.to_string();
            return;
        };
        let reference = current.passage.reference().to_string();
        let text = format!("{reference}\n{}", current.passage.text());
        match Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
            Ok(()) => self.status = format!("Copied {reference}"),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e}");
                self.status = "Clipboard unavailable".to_string();
            }
        }
    }

    fn list_len(&self, focus: Focus) -> usize {
        let Some(session) = &self.session else {
            return 0;
        };
        match focus {
            Focus::Books => session.index().book_count(),
            Focus::Chapters => self
                .selected_book
                .as_ref()
                .and_then(|book| session.index().book_meta(book))
                .map_or(0, |meta| meta.chapters().len()),
            Focus::Verses => self.verse_rows().len(),
        }
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.list_len(self.focus);
        let state = match self.focus {
            Focus::Books => &mut self.book_list_state,
            Focus::Chapters => &mut self.chapter_list_state,
            Focus::Verses => &mut self.verse_list_state,
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let next = match (state.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        state.select(Some(next));
    }

    fn select(&mut self) {
        match self.focus {
            Focus::Books => self.select_book(),
            Focus::Chapters => self.select_chapter(),
            Focus::Verses => self.select_verse(),
        }
    }

    fn select_book(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        let Some(book) = self.book_list_state.selected().and_then(|i| session.index().book_at(i)).cloned() else {
            return;
        };
        session.clear_search();
        session.clear();
        self.selected_book = Some(book);
        self.selected_chapter = None;
        self.chapter_list_state.select(Some(0));
        self.verse_list_state.select(None);
        self.focus = Focus::Chapters;
    }

    fn select_chapter(&mut self) {
        let (Some(session), Some(book)) = (&mut self.session, &self.selected_book) else {
            return;
        };
        let chapter = self
            .chapter_list_state
            .selected()
            .and_then(|i| session.index().book_meta(book)?.chapters().get(i).copied());
        let Some(chapter) = chapter else {
            return;
        };
        session.clear_search();
        match session.go_to_chapter(book, chapter) {
            Ok(_) => {
                self.focus = Focus::Verses;
                self.sync_to_position();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn select_verse(&mut self) {
        let Some(position) = self
            .verse_list_state
            .selected()
            .and_then(|i| self.verse_rows().into_iter().nth(i))
            .map(|row| row.position)
        else {
            return;
        };
        let Some(session) = &mut self.session else {
            return;
        };
        session.clear_search();
        if let Err(e) = session.go_to(position) {
            self.status = e.to_string();
            return;
        }
        self.sync_to_position();
    }

    /// Point every picker at the session position.
    fn sync_to_position(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let Some(position) = session.position() else {
            return;
        };
        let index = session.index();

        self.book_list_state.select(index.book_position(&position.book));
        self.chapter_list_state.select(
            index
                .book_meta(&position.book)
                .and_then(|meta| meta.chapters().iter().position(|&c| c == position.chapter)),
        );
        let verse_slot = match session.search_results() {
            Some(results) => results.hits.iter().position(|hit| hit == position),
            None => index
                .chapter_verses(&position.book, position.chapter)
                .position(|(verse, _)| verse == position.verse),
        };
        self.verse_list_state.select(verse_slot);
        self.selected_book = Some(position.book.clone());
        self.selected_chapter = Some(position.chapter);
    }

    /// Rows for the verse list: search hits in results mode, else the chapter.
    pub fn verse_rows(&self) -> Vec<VerseRow<'_>> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let index = session.index();

        if let Some(results) = session.search_results() {
            return results
                .hits
                .iter()
                .filter_map(|position| {
                    let passage = index.passage_at(position)?;
                    Some(VerseRow {
                        position: position.clone(),
                        label: passage.reference().to_string(),
                        passage,
                    })
                })
                .collect();
        }

        let (Some(book), Some(chapter)) = (&self.selected_book, self.selected_chapter) else {
            return Vec::new();
        };
        index
            .chapter_verses(book, chapter)
            .map(|(verse, passage)| VerseRow {
                position: Position::new(book.clone(), chapter, verse),
                label: verse.to_string(),
                passage,
            })
            .collect()
    }

    /// Heading for the verse list pane.
    pub fn verse_list_title(&self) -> String {
        let Some(session) = &self.session else {
            return "Verses".to_string();
        };
        if session.search_results().is_some() {
            return "Search Results".to_string();
        }
        match (&self.selected_book, self.selected_chapter) {
            (Some(book), Some(chapter)) => session
                .index()
                .book_meta(book)
                .map_or_else(|| "Verses".to_string(), |meta| format!("{} {chapter}", meta.display_name())),
            _ => "Verses".to_string(),
        }
    }
}

fn common_prefix(a: &str, b: &str) -> String {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x.eq_ignore_ascii_case(y))
        .map(|(x, _)| x)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::RawEntry;
    use crate::services::SavedLocation;
    use std::path::PathBuf;

    fn sample_index() -> BibleIndex {
        let keys = [
            "Jude 1:1", "Jude 1:2", "Jude 1:3",
            "John 1:1", "John 3:16", "John 3:17",
            "Joel 2:28",
        ];
        BibleIndex::build(keys.iter().map(|k| RawEntry::new(*k, format!("so loved {k}"), Some(k))))
    }

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default().with_data_path(dir.join("missing.json"));
        config.location_path = Some(dir.join("last_location.json"));
        config.presenter_feed_path = None;
        config
    }

    fn ready_app(dir: &std::path::Path) -> App {
        let mut app = App::new(test_config(dir));
        app.install_index(sample_index());
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.apply(Action::PromptInput(c));
        }
    }

    #[test]
    fn test_install_index_enters_browse() {
        let dir = tempfile::tempdir().unwrap();
        let app = ready_app(dir.path());
        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.status, messages::READY);
        assert_eq!(app.book_list_state.selected(), Some(0));
        assert!(app.session.as_ref().unwrap().position().is_none());
    }

    #[test]
    fn test_load_failure_is_terminal_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(test_config(dir.path()));
        app.load_failed(&Error::DataUnavailable("empty".into()));
        assert_eq!(app.mode, AppMode::Unavailable);
        assert_eq!(app.status, messages::LOAD_FAILED);
    }

    #[test]
    fn test_reference_prompt_and_arrows() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());

        app.apply(Action::OpenReferencePrompt);
        type_text(&mut app, "john 3:16");
        app.apply(Action::PromptSubmit);
        assert!(app.prompt.is_none());
        assert_eq!(app.verse_list_title(), "John 3");
        assert_eq!(app.verse_list_state.selected(), Some(0));

        app.apply(Action::NextVerse);
        let position = app.session.as_ref().unwrap().position().cloned().unwrap();
        assert_eq!(position.to_string(), "john 3:17");
        assert_eq!(app.verse_list_state.selected(), Some(1));

        // Joel 2:1 is not stored, so the step into Joel is refused
        app.apply(Action::NextVerse);
        let position = app.session.as_ref().unwrap().position().cloned().unwrap();
        assert_eq!(position.to_string(), "john 3:17");
        assert_eq!(app.book_list_state.selected(), Some(1));

        app.apply(Action::PreviousVerse);
        let position = app.session.as_ref().unwrap().position().cloned().unwrap();
        assert_eq!(position.to_string(), "john 3:16");
    }

    #[test]
    fn test_bad_reference_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::OpenReferencePrompt);
        type_text(&mut app, "John 9:9");
        app.apply(Action::PromptSubmit);
        assert_eq!(app.status, messages::REFERENCE_NOT_FOUND);
    }

    #[test]
    fn test_keyword_reference_miss_falls_back_to_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::OpenKeywordPrompt);
        type_text(&mut app, "loved jude 1:1");
        app.apply(Action::PromptSubmit);

        assert_eq!(app.verse_list_title(), "Search Results");
        let labels: Vec<_> = app.verse_rows().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["Jude 1:1"]);
        assert_eq!(app.status, "1 result(s) for \"loved jude 1:1\"");
        assert!(app.session.as_ref().unwrap().position().is_none());

        // A resolvable reference still navigates
        app.apply(Action::OpenKeywordPrompt);
        type_text(&mut app, "john 3:16");
        app.apply(Action::PromptSubmit);
        assert_eq!(app.verse_list_title(), "John 3");
        assert_eq!(app.status, messages::READY);
    }

    #[test]
    fn test_keyword_search_lists_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::OpenKeywordPrompt);
        type_text(&mut app, "JOHN 3");
        app.apply(Action::PromptSubmit);

        assert_eq!(app.verse_list_title(), "Search Results");
        let labels: Vec<_> = app.verse_rows().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["John 3:16", "John 3:17"]);
        assert_eq!(app.status, "2 result(s) for \"JOHN 3\"");

        app.apply(Action::MoveDown);
        app.apply(Action::Select);
        assert_eq!(app.verse_list_title(), "John 3");
        assert_eq!(app.verse_list_state.selected(), Some(1));
    }

    #[test]
    fn test_empty_search_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::OpenKeywordPrompt);
        type_text(&mut app, "zebra");
        app.apply(Action::PromptSubmit);
        assert_eq!(app.status, messages::NO_RESULTS);
        assert!(app.verse_rows().is_empty());
        app.apply(Action::ClearSearch);
        assert_eq!(app.verse_list_title(), "Verses");
    }

    #[test]
    fn test_picker_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::MoveDown); // John
        app.apply(Action::Select);
        assert_eq!(app.focus, Focus::Chapters);
        assert!(app.session.as_ref().unwrap().position().is_none());

        app.apply(Action::MoveDown); // chapter 3
        app.apply(Action::Select);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.current_passage().unwrap().passage.reference(), "John 3:16");
        assert_eq!(app.focus, Focus::Verses);
    }

    #[test]
    fn test_tab_completes_book_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::OpenReferencePrompt);
        type_text(&mut app, "jo");
        app.apply(Action::PromptComplete);
        // John and Joel share only "Jo"
        assert_eq!(app.prompt.as_ref().unwrap().buffer, "jo");
        assert_eq!(app.status, "John, Joel");

        type_text(&mut app, "e");
        app.apply(Action::PromptComplete);
        assert_eq!(app.prompt.as_ref().unwrap().buffer, "Joel ");
    }

    #[test]
    fn test_presenter_size_steps_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::PresenterLarger);
        assert_eq!(app.display_size.get().px(), 72);
        for _ in 0..40 {
            app.apply(Action::PresenterLarger);
        }
        assert_eq!(app.display_size.get().px(), 80);
        assert_eq!(app.status, "Presenter size: 80px");
    }

    #[test]
    fn test_location_saved_and_restored() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut app = ready_app(dir.path());
            app.apply(Action::OpenReferencePrompt);
            type_text(&mut app, "Jude 1:2");
            app.apply(Action::PromptSubmit);
        }
        let saved = FileLocationStore::new(dir.path().join("last_location.json")).load().unwrap();
        assert_eq!(saved, Some(SavedLocation { book: "jude".into(), chapter: 1, verse: 2 }));

        let app = ready_app(dir.path());
        let position = app.session.as_ref().unwrap().position().cloned().unwrap();
        assert_eq!(position.to_string(), "jude 1:2");
        assert_eq!(app.verse_list_title(), "Jude 1");
    }

    #[test]
    fn test_reload_keeps_valid_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = ready_app(dir.path());
        app.apply(Action::OpenReferencePrompt);
        type_text(&mut app, "Joel 2:28");
        app.apply(Action::PromptSubmit);

        app.install_index(sample_index());
        let position = app.session.as_ref().unwrap().position().cloned();
        assert_eq!(position.map(|p| p.to_string()), Some("joel 2:28".to_string()));
    }

    #[tokio::test]
    async fn test_background_load() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("bible.json");
        std::fs::write(&data, r#"{"Amos 1:1": {"text": "The words of Amos", "reference": "Amos 1:1"}}"#)
            .unwrap();
        let mut config = test_config(dir.path()).with_data_path(data);
        config.location_path = None::<PathBuf>;

        let mut app = App::new(config);
        app.start_loading();
        for _ in 0..200 {
            app.handle_updates();
            if !app.is_loading {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(app.mode, AppMode::Browse);
        assert_eq!(app.session.as_ref().unwrap().index().len(), 1);
    }
}
