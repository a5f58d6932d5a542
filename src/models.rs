//! Data models for news items and their batch representation.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`NewsItem`]: a single collected, summarized, categorized news entry
//! - [`Category`]: the fixed topic enumeration the site renders as tabs
//!
//! A `NewsItem` is immutable once created. The update pipeline never edits an
//! item in place; items are only prepended to the store or dropped from its
//! tail.

use serde::{Deserialize, Serialize};

/// Offset added to collector-assigned ids so generated items never collide
/// with the hand-written entries that seeded the site's original array.
pub const ID_OFFSET: u32 = 300;

/// Topic category for a news item.
///
/// The site renders these as filter tabs, so the set is closed. Serialized
/// lowercase to match the labels stored in `script.js`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Entrance exams: schedules, application counts, difficulty, results.
    Entrance,
    /// School life: information sessions, open campus days, festivals.
    School,
    /// Studying: prep strategies, teaching materials, cram schools.
    Study,
}

impl Category {
    /// The lowercase label used in the store literal and the batch file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Entrance => "entrance",
            Category::School => "school",
            Category::Study => "study",
        }
    }

    /// Parse a stored label leniently. Unknown labels fall back to
    /// [`Category::Entrance`] rather than failing the whole decode.
    pub fn from_label(label: &str) -> Self {
        match label {
            "school" => Category::School,
            "study" => Category::Study,
            _ => Category::Entrance,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Entrance
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single news entry as it appears in the store and the batch file.
///
/// # Identity
///
/// `url` is the item's identity: the store never holds two items with the
/// same URL, and deduplication compares nothing else. `id` is a display
/// convenience assigned by the collector (`index + ID_OFFSET`) and is not
/// guaranteed unique across runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsItem {
    /// Collector-assigned numeric id, absent on hand-written entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Headline as returned by the search API.
    pub title: String,
    /// Short display summary, roughly 100 characters.
    pub summary: String,
    /// Collection date in `YYYY-MM-DD` form (not the publish date).
    pub date: String,
    /// Topic category.
    #[serde(default)]
    pub category: Category,
    /// Human-readable origin label, from the source table.
    pub source: String,
    /// The item's canonical link and dedup key. Never empty in the store.
    pub url: String,
}
