//! Keyword-based topic classification.
//!
//! Classification is intentionally dumb: lowercase the title and snippet,
//! look for known keywords, first matching bucket wins. Items that match
//! nothing land in [`Category::Entrance`], the site's main tab, so the
//! function is total and the pipeline never stalls on an unclassifiable item.

use crate::models::Category;
use once_cell::sync::Lazy;

static ENTRANCE_WORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["入試", "受験", "試験", "合格", "倍率", "難易度"]);

static SCHOOL_WORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["学校", "説明会", "文化祭", "オープン", "見学"]);

static STUDY_WORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["勉強", "学習", "対策", "教材", "塾"]);

/// Classify an item from its title and snippet.
///
/// Buckets are checked in priority order: entrance-exam words, then school
/// events, then study topics. Always returns a value.
pub fn categorize(title: &str, snippet: &str) -> Category {
    let text = format!("{} {}", title, snippet).to_lowercase();

    if ENTRANCE_WORDS.iter().any(|w| text.contains(w)) {
        Category::Entrance
    } else if SCHOOL_WORDS.iter().any(|w| text.contains(w)) {
        Category::School
    } else if STUDY_WORDS.iter().any(|w| text.contains(w)) {
        Category::Study
    } else {
        Category::Entrance
    }
}
