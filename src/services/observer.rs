//! Current-passage change notifications.
//!
//! Display layers (presenter feeds, location persistence) subscribe to a
//! [`crate::services::session::Session`] instead of being called directly, so
//! the session does not know about any transport.

use crate::bible::index::Passage;
use crate::types::Position;

/// What the session currently shows.
///
/// Both fields are `None` when no passage is selected.
#[derive(Debug, Clone, Copy)]
pub struct PassageChange<'a> {
    /// Current position.
    pub position: Option<&'a Position>,
    /// Passage stored at that position.
    pub passage: Option<&'a Passage>,
}

impl<'a> PassageChange<'a> {
    /// The "no passage selected" state.
    pub const fn cleared() -> Self {
        Self { position: None, passage: None }
    }

    /// A resolved passage.
    pub const fn resolved(position: &'a Position, passage: &'a Passage) -> Self {
        Self {
            position: Some(position),
            passage: Some(passage),
        }
    }
}

/// Trait for consumers of current-passage changes.
///
/// Implementations must not fail the session: errors are logged and dropped.
pub trait PassageObserver {
    /// Called after every change of the session's position, and on refresh.
    fn passage_changed(&mut self, change: &PassageChange<'_>);

    /// Get the name of this observer (for debugging/logging).
    fn name(&self) -> &'static str;
}
