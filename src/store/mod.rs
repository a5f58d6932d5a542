//! The persistent news store: merge pipeline and embedded-literal codec.
//!
//! The store is an ordered sequence of [`NewsItem`](crate::models::NewsItem),
//! newest first, unique by URL, capped at a maximum length. It has no file of
//! its own: its durable form is the `const newsData = [ ... ];` array literal
//! embedded in the site's `script.js`, which the front end consumes directly.
//!
//! # Submodules
//!
//! - [`pipeline`]: pure dedup/merge/evict steps and the combined
//!   [`apply_update`](pipeline::apply_update) entry point
//! - [`codec`]: locates the literal inside the asset, decodes it into items,
//!   and re-encodes without touching a byte outside the literal span
//!
//! # Update Lifecycle
//!
//! An update reads the asset once, decodes the store, runs the pure pipeline
//! over it, and writes the whole asset back in a single `fs::write`. Items
//! are never edited in place; a run only prepends new items and drops from
//! the tail.

pub mod codec;
pub mod pipeline;

pub use codec::{decode, encode, CodecError};
pub use pipeline::{apply_update, dedup_batch, evict, merge, UpdateOutcome};

/// Default cap on retained items. The front page paginates well below this;
/// the tail exists so older items stay linkable for a while.
pub const DEFAULT_MAX_ITEMS: usize = 250;
