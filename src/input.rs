//! Input handling abstractions.
//!
//! Key events are translated into [`Action`]s by mode-specific handlers, so
//! the key map can be tested without a terminal or a loaded corpus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Something the user asked the reader to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the application.
    Quit,
    /// Show or hide the key help.
    ToggleHelp,
    /// Step to the next verse.
    NextVerse,
    /// Step to the previous verse.
    PreviousVerse,
    /// Move focus to the next pane.
    FocusNext,
    /// Move focus to the previous pane.
    FocusPrevious,
    /// Move the selection up in the focused list.
    MoveUp,
    /// Move the selection down in the focused list.
    MoveDown,
    /// Activate the selected list entry.
    Select,
    /// Open the prompt for a reference such as `John 3:16`.
    OpenReferencePrompt,
    /// Open the prompt for a keyword search.
    OpenKeywordPrompt,
    /// Cycle the keyword search scope.
    CycleScope,
    /// Leave search results mode.
    ClearSearch,
    /// Toggle the full-screen presenter view.
    TogglePresenter,
    /// Increase the presenter display size.
    PresenterLarger,
    /// Decrease the presenter display size.
    PresenterSmaller,
    /// Copy the current passage to the clipboard.
    CopyPassage,
    /// Rebuild the index from the dataset.
    Reload,
    /// Type a character into the prompt.
    PromptInput(char),
    /// Delete the last prompt character.
    PromptBackspace,
    /// Complete a book name in the prompt.
    PromptComplete,
    /// Run the prompt.
    PromptSubmit,
    /// Close the prompt without running it.
    PromptCancel,
}

/// Result of processing an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// The input maps to an action.
    Action(Action),
    /// The input was ignored (not applicable to this handler).
    Ignored,
}

/// Application modes as seen by input handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Dataset still loading or unavailable.
    Waiting,
    /// Normal browsing.
    Browse,
    /// Full-screen presenter view.
    Presenter,
}

/// Context passed to input handlers.
pub struct InputContext {
    /// Current application mode.
    pub mode: InputMode,
    /// Whether help is currently shown.
    pub show_help: bool,
    /// Whether the search prompt is open.
    pub prompt_open: bool,
}

/// Trait for handling keyboard input.
///
/// Implementations of this trait handle input for specific modes
/// or input contexts.
pub trait InputHandler {
    /// Handle a key event.
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult;

    /// Get the name of this handler (for debugging).
    fn name(&self) -> &'static str;
}

/// Handler for global shortcuts (help, quit).
#[derive(Debug, Default)]
pub struct GlobalHandler;

impl InputHandler for GlobalHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return InputResult::Action(Action::Quit);
        }
        if ctx.prompt_open {
            return InputResult::Ignored;
        }
        match key.code {
            KeyCode::F(1) | KeyCode::Char('?') => InputResult::Action(Action::ToggleHelp),
            KeyCode::Esc if ctx.show_help => InputResult::Action(Action::ToggleHelp),
            KeyCode::Char('q') => InputResult::Action(Action::Quit),
            KeyCode::F(5) | KeyCode::Char('r') if ctx.mode != InputMode::Presenter => {
                InputResult::Action(Action::Reload)
            }
            _ => InputResult::Ignored,
        }
    }

    fn name(&self) -> &'static str {
        "GlobalHandler"
    }
}

/// Handler for the search prompt.
#[derive(Debug, Default)]
pub struct PromptHandler;

impl InputHandler for PromptHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        if !ctx.prompt_open {
            return InputResult::Ignored;
        }
        let action = match key.code {
            KeyCode::Enter => Action::PromptSubmit,
            KeyCode::Esc => Action::PromptCancel,
            KeyCode::Backspace => Action::PromptBackspace,
            KeyCode::Tab => Action::PromptComplete,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::PromptInput(c),
            _ => return InputResult::Ignored,
        };
        InputResult::Action(action)
    }

    fn name(&self) -> &'static str {
        "PromptHandler"
    }
}

/// Handler for browsing and presenter modes.
#[derive(Debug, Default)]
pub struct BrowseHandler;

impl InputHandler for BrowseHandler {
    fn handle(&mut self, key: KeyEvent, ctx: &InputContext) -> InputResult {
        if ctx.prompt_open || ctx.show_help {
            return InputResult::Ignored;
        }
        let action = match (ctx.mode, key.code) {
            (InputMode::Waiting, _) => return InputResult::Ignored,
            (_, KeyCode::Right) => Action::NextVerse,
            (_, KeyCode::Left) => Action::PreviousVerse,
            (_, KeyCode::Char('p')) => Action::TogglePresenter,
            (_, KeyCode::Char('+' | '=')) => Action::PresenterLarger,
            (_, KeyCode::Char('-')) => Action::PresenterSmaller,
            (_, KeyCode::Char('y')) => Action::CopyPassage,
            (InputMode::Presenter, KeyCode::Esc) => Action::TogglePresenter,
            (InputMode::Presenter, _) => return InputResult::Ignored,
            (_, KeyCode::Tab) => Action::FocusNext,
            (_, KeyCode::BackTab) => Action::FocusPrevious,
            (_, KeyCode::Up | KeyCode::Char('k')) => Action::MoveUp,
            (_, KeyCode::Down | KeyCode::Char('j')) => Action::MoveDown,
            (_, KeyCode::Enter) => Action::Select,
            (_, KeyCode::Char('/')) => Action::OpenKeywordPrompt,
            (_, KeyCode::Char('g' | ':')) => Action::OpenReferencePrompt,
            (_, KeyCode::Char('s')) => Action::CycleScope,
            (_, KeyCode::Esc) => Action::ClearSearch,
            _ => return InputResult::Ignored,
        };
        InputResult::Action(action)
    }

    fn name(&self) -> &'static str {
        "BrowseHandler"
    }
}

/// Run `key` through the handlers in priority order.
pub fn dispatch(key: KeyEvent, ctx: &InputContext) -> Option<Action> {
    let mut handlers: [Box<dyn InputHandler>; 3] = [
        Box::new(GlobalHandler),
        Box::new(PromptHandler),
        Box::new(BrowseHandler),
    ];
    handlers.iter_mut().find_map(|handler| match handler.handle(key, ctx) {
        InputResult::Action(action) => {
            tracing::trace!("{} mapped {:?} to {action:?}", handler.name(), key.code);
            Some(action)
        }
        InputResult::Ignored => None,
    })
}
