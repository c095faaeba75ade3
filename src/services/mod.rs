//! Session state and the adapters that observe it.
//!
//! The [`session::Session`] owns the current position; presenter feeds and
//! location persistence subscribe to it through [`observer::PassageObserver`].

pub mod location;
pub mod observer;
pub mod presenter;
pub mod session;

pub use location::{FileLocationStore, LocationRecorder, LocationStore, SavedLocation};
pub use observer::{PassageChange, PassageObserver};
pub use presenter::{DisplaySize, PresenterFeed, PresenterUpdate, SharedDisplaySize};
pub use session::{CurrentPassage, SearchResults, Session};
