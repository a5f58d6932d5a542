//! Pure merge pipeline: dedup, merge, evict.
//!
//! Every function here is a pure transformation over item sequences; nothing
//! touches the filesystem or network. The update binary wires them to the
//! codec. Running the same batch twice is a no-op by construction: the second
//! run's candidates are all already in the store's URL set.

use crate::models::NewsItem;
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Result of applying one batch to the store.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// The resulting store sequence, newest first.
    pub items: Vec<NewsItem>,
    /// Candidates that survived deduplication and were prepended.
    pub added: usize,
    /// Candidates dropped as duplicates (in-batch or already stored).
    pub duplicates: usize,
    /// Old items dropped from the tail to respect the cap.
    pub evicted: usize,
}

impl UpdateOutcome {
    /// True when the batch contributed nothing and the store is unchanged.
    pub fn is_noop(&self) -> bool {
        self.added == 0
    }
}

/// Filter a candidate batch against the store's URL set and itself.
///
/// A candidate survives iff its URL is not already stored and has not
/// appeared earlier in the batch (first occurrence wins). Relative order of
/// survivors is preserved. Pure; `existing_urls` is read-only.
pub fn dedup_batch(batch: Vec<NewsItem>, existing_urls: &HashSet<String>) -> Vec<NewsItem> {
    batch
        .into_iter()
        .filter(|item| !existing_urls.contains(&item.url))
        .unique_by(|item| item.url.clone())
        .collect()
}

/// Prepend deduplicated new items to the existing store.
///
/// Recency ordering is positional: new items always go ahead of everything
/// already stored, and each sub-sequence keeps its internal order. No
/// interleaving by publish date.
pub fn merge(new_items: Vec<NewsItem>, existing: Vec<NewsItem>) -> Vec<NewsItem> {
    new_items.into_iter().chain(existing).collect()
}

/// Truncate the merged sequence to `max_items`, dropping the oldest tail.
///
/// Returns the kept sequence and the count dropped. No per-item inspection;
/// position is the only eviction criterion.
pub fn evict(mut items: Vec<NewsItem>, max_items: usize) -> (Vec<NewsItem>, usize) {
    if items.len() > max_items {
        let dropped = items.len() - max_items;
        items.truncate(max_items);
        (items, dropped)
    } else {
        (items, 0)
    }
}

/// Run the full dedup → merge → evict pipeline for one batch.
#[instrument(level = "info", skip_all, fields(existing = existing.len(), batch = batch.len(), max_items))]
pub fn apply_update(
    existing: Vec<NewsItem>,
    batch: Vec<NewsItem>,
    max_items: usize,
) -> UpdateOutcome {
    let batch_len = batch.len();
    let existing_urls: HashSet<String> = existing.iter().map(|item| item.url.clone()).collect();

    let fresh = dedup_batch(batch, &existing_urls);
    let added = fresh.len();
    let duplicates = batch_len - added;
    debug!(added, duplicates, "Deduplicated batch");

    let (items, evicted) = evict(merge(fresh, existing), max_items);

    UpdateOutcome {
        items,
        added,
        duplicates,
        evicted,
    }
}
