//! Bible corpus: reference parsing, indexing, traversal and keyword search.
//!
//! [`load_corpus`] is the only entry point that touches the filesystem; the
//! rest operates on an immutable [`BibleIndex`].

use std::path::Path;
use std::time::Instant;

pub mod dataset;
pub mod index;
pub mod navigator;
pub mod reference;
pub mod search;

pub use dataset::{RawDataset, RawEntry};
pub use index::{BibleIndex, BookMeta, IndexStats, Passage};
pub use reference::{parse_reference, split_reference};
pub use search::SearchHit;

use crate::error::{Error, Result};

/// Read the dataset at `path` and index it.
///
/// Fails when the file cannot be read or parsed, or when it yields no
/// passages at all, so callers never work from a partial corpus.
pub fn load_corpus(path: &Path) -> Result<BibleIndex> {
    let started = Instant::now();
    let dataset = RawDataset::load(path)?;
    let rejected = dataset.rejected();
    let index = BibleIndex::from_dataset(dataset);

    if index.is_empty() {
        return Err(Error::DataUnavailable(format!(
            "no verses found in {}",
            path.display()
        )));
    }

    let stats = index.stats();
    tracing::info!(
        passages = stats.indexed,
        books = index.book_count(),
        skipped_keys = stats.skipped_keys,
        rejected_values = rejected,
        overwritten = stats.overwritten,
        merged_names = stats.merged_names,
        "Indexed {} in {:?}",
        path.display(),
        started.elapsed()
    );
    Ok(index)
}
