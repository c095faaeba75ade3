//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// Presenter display size constants.
pub mod presenter {
    /// Default presenter display size in pixels.
    pub const DEFAULT_SIZE_PX: u16 = 70;

    /// Smallest presenter display size allowed.
    pub const MIN_SIZE_PX: u16 = 10;

    /// Largest presenter display size allowed.
    pub const MAX_SIZE_PX: u16 = 80;

    /// Pixels added or removed per size step.
    pub const SIZE_STEP_PX: u16 = 2;
}

/// File locations relative to the platform data directory.
pub mod storage {
    /// Subdirectory of the platform data directory used by the application.
    pub const APP_DIR: &str = "versenav";

    /// Dataset file name looked up when no path is configured.
    pub const DEFAULT_DATASET: &str = "kjv1611.json";

    /// Last viewed location file name.
    pub const LOCATION_FILE: &str = "last_location.json";

    /// Log file name for the terminal UI.
    pub const LOG_FILE: &str = "versenav.log";
}

/// Search prompt constants.
pub mod search {
    /// Example queries offered alongside book names in the prompt hint.
    pub const EXAMPLE_QUERIES: &[&str] = &["John 3:16", "Psalm 23:1", "love", "faith", "grace"];
}

/// Status and placeholder messages.
pub mod messages {
    /// Shown while the dataset is loading.
    pub const LOADING: &str = "Loading Bible data...";

    /// Shown once the index is ready.
    pub const READY: &str = "Ready. Select a verse or search (e.g. \"John 3:16\" or keyword).";

    /// Terminal state when the dataset cannot be used.
    pub const LOAD_FAILED: &str = "Error loading Bible data.";

    /// Reference prompt failure.
    pub const REFERENCE_NOT_FOUND: &str = "Could not find reference. Try \"John 3:16\".";

    /// Placeholder reference when no passage is selected.
    pub const NO_PASSAGE_REFERENCE: &str = "No verse selected";

    /// Placeholder text when no passage is selected.
    pub const NO_PASSAGE_TEXT: &str =
        "Select a book, chapter, and verse from the left, or use the search prompt.";

    /// Verse pane hint before a chapter is chosen.
    pub const PICK_CHAPTER: &str = "Select a book and chapter to view verses.";

    /// Verse pane hint once a chapter is listed.
    pub const PICK_VERSE: &str = "Press Enter on a verse to show it.";

    /// Verse pane hint for an empty result set.
    pub const NO_RESULTS: &str = "No results for that search.";
}

/// UI layout constants.
pub mod ui {
    /// Width of the book/chapter picker column.
    pub const PICKER_WIDTH: u16 = 24;

    /// Percentage of the remaining width given to the passage pane.
    pub const PASSAGE_PERCENT: u16 = 45;
}

/// Async task constants.
pub mod async_tasks {
    /// Channel buffer size for async task communication.
    pub const CHANNEL_BUFFER_SIZE: usize = 4;
}
