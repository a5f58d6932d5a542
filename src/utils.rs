//! Small helpers shared by the pipeline stages.

use chrono::Local;

/// Today's date in the `YYYY-MM-DD` form stored on every item.
pub fn today_string() -> String {
    Local::now().date_naive().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and byte
/// count indicator appended. Character-based so multi-byte titles are never
/// split mid-codepoint.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max).collect();
        format!("{}…(+{} bytes)", prefix, s.len() - prefix.len())
    }
}
