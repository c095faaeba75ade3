//! Last viewed location persistence.
//!
//! The stored triple is untrusted: the session validates it against the live
//! index before using it (see `Session::restore`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::storage;
use crate::error::{Error, Result};
use crate::services::observer::{PassageChange, PassageObserver};
use crate::types::Position;

/// A `{book, chapter, verse}` triple as persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLocation {
    /// Book key (normalized on restore).
    pub book: String,
    /// Chapter number.
    pub chapter: u32,
    /// Verse number.
    pub verse: u32,
}

impl From<&Position> for SavedLocation {
    fn from(position: &Position) -> Self {
        Self {
            book: position.book.to_string(),
            chapter: position.chapter,
            verse: position.verse,
        }
    }
}

/// Trait for last-location storage backends.
pub trait LocationStore {
    /// Read the saved location, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<SavedLocation>>;

    /// Replace the saved location.
    fn save(&mut self, location: &SavedLocation) -> Result<()>;

    /// Get the name of this store (for debugging/logging).
    fn name(&self) -> &'static str;
}

/// Default location file under the platform data directory.
pub fn default_location_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(storage::APP_DIR).join(storage::LOCATION_FILE))
}

/// JSON file backed location store.
#[derive(Debug, Clone)]
pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    /// Store the location at `path`.
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocationStore for FileLocationStore {
    fn load(&self) -> Result<Option<SavedLocation>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs_err::read_to_string(&self.path)
            .map_err(|e| Error::io(e, self.path.clone()))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::parse(e.to_string(), self.path.clone()))
    }

    fn save(&mut self, location: &SavedLocation) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| Error::Persistence(e.to_string()))?;
        }
        let json = serde_json::to_string(location).map_err(|e| Error::Persistence(e.to_string()))?;
        fs_err::write(&self.path, json).map_err(|e| Error::Persistence(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "FileLocationStore"
    }
}

/// Observer saving every resolved position to a [`LocationStore`].
pub struct LocationRecorder<S> {
    store: S,
}

impl<S: LocationStore> LocationRecorder<S> {
    /// Record into `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: LocationStore> PassageObserver for LocationRecorder<S> {
    fn passage_changed(&mut self, change: &PassageChange<'_>) {
        // Clearing keeps the last resolved location.
        let Some(position) = change.position else {
            return;
        };
        if let Err(e) = self.store.save(&SavedLocation::from(position)) {
            tracing::warn!("{} could not save {position}: {e}", self.store.name());
        }
    }

    fn name(&self) -> &'static str {
        "LocationRecorder"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::index::Passage;
    use crate::types::BookKey;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocationStore::new(dir.path().join("last_location.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileLocationStore::new(dir.path().join("nested").join("last.json"));
        let saved = SavedLocation { book: "psalms".into(), chapter: 23, verse: 1 };
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), Some(saved));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.json");
        std::fs::write(&path, "{\"book\": ").unwrap();
        let store = FileLocationStore::new(path);
        assert!(matches!(store.load(), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_recorder_ignores_cleared_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.json");
        let mut recorder = LocationRecorder::new(FileLocationStore::new(path.clone()));

        let position = Position::new(BookKey::new("ruth"), 1, 16);
        let passage = Passage::new("whither thou goest", "Ruth 1:16");
        recorder.passage_changed(&PassageChange::resolved(&position, &passage));
        recorder.passage_changed(&PassageChange::cleared());

        let saved = FileLocationStore::new(path).load().unwrap().unwrap();
        assert_eq!(saved, SavedLocation { book: "ruth".into(), chapter: 1, verse: 16 });
    }
}
