//! Presenter feed for a secondary display.
//!
//! The feed writes a small JSON snapshot (`reference`, `text`, `size`) every
//! time the current passage changes. Any external display can watch the file;
//! the terminal UI has its own full-screen presenter view on top of the same
//! session state.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::{messages, presenter};
use crate::error::{Error, Result};
use crate::services::observer::{PassageChange, PassageObserver};

/// Presenter display size in pixels, clamped to the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DisplaySize(u16);

impl DisplaySize {
    /// Create a size, clamping it into range.
    pub fn new(px: u16) -> Self {
        Self(px.clamp(presenter::MIN_SIZE_PX, presenter::MAX_SIZE_PX))
    }

    /// Size in pixels.
    pub const fn px(self) -> u16 {
        self.0
    }

    /// One step larger.
    #[must_use]
    pub fn larger(self) -> Self {
        Self::new(self.0.saturating_add(presenter::SIZE_STEP_PX))
    }

    /// One step smaller.
    #[must_use]
    pub fn smaller(self) -> Self {
        Self::new(self.0.saturating_sub(presenter::SIZE_STEP_PX))
    }

    /// CSS-style size string, e.g. `"70px"`.
    pub fn css(self) -> String {
        format!("{}px", self.0)
    }
}

impl Default for DisplaySize {
    fn default() -> Self {
        Self::new(presenter::DEFAULT_SIZE_PX)
    }
}

/// Payload pushed to the secondary display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenterUpdate {
    /// Reference line, or the placeholder when nothing is selected.
    pub reference: String,
    /// Passage text, empty when nothing is selected.
    pub text: String,
    /// Display size, e.g. `"70px"`.
    pub size: String,
}

impl PresenterUpdate {
    /// Build the payload for a change at the given size.
    pub fn from_change(change: &PassageChange<'_>, size: DisplaySize) -> Self {
        change.passage.map_or_else(
            || Self {
                reference: messages::NO_PASSAGE_REFERENCE.to_string(),
                text: String::new(),
                size: size.css(),
            },
            |passage| Self {
                reference: passage.reference().to_string(),
                text: passage.text().to_string(),
                size: size.css(),
            },
        )
    }
}

/// Shared, UI-adjustable presenter size.
pub type SharedDisplaySize = Rc<Cell<DisplaySize>>;

/// Observer writing [`PresenterUpdate`] snapshots to a file.
pub struct PresenterFeed {
    path: PathBuf,
    size: SharedDisplaySize,
}

impl PresenterFeed {
    /// Create a feed writing to `path` with a size shared with the UI.
    pub fn new(path: PathBuf, size: SharedDisplaySize) -> Self {
        Self { path, size }
    }

    /// Feed file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one snapshot, replacing the previous file in a single rename.
    pub fn write(&self, update: &PresenterUpdate) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(update)
            .map_err(|e| Error::Msg(format!("Failed to encode presenter update: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs_err::write(&tmp, json).map_err(|e| Error::io(e, tmp.clone()))?;
        fs_err::rename(&tmp, &self.path).map_err(|e| Error::io(e, self.path.clone()))?;
        Ok(())
    }
}

impl PassageObserver for PresenterFeed {
    fn passage_changed(&mut self, change: &PassageChange<'_>) {
        let update = PresenterUpdate::from_change(change, self.size.get());
        if let Err(e) = self.write(&update) {
            tracing::warn!("Failed to update presenter feed {}: {e}", self.path.display());
        }
    }

    fn name(&self) -> &'static str {
        "PresenterFeed"
    }
}
