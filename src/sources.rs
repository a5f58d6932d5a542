//! Source labels derived from item URLs.
//!
//! The site displays a human-readable origin label next to each item. Labels
//! come from a static table keyed by registrable domain; anything the table
//! does not know gets [`GENERIC_SOURCE_LABEL`]. The table covers the outlets
//! the search queries are restricted to, so the fallback mostly shows up when
//! a query's site filter is loosened.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Label used when the item's domain is not in the table.
pub const GENERIC_SOURCE_LABEL: &str = "ニュースサイト";

static SOURCE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("diamond.jp", "ダイヤモンド・オンライン"),
        ("resemom.jp", "リセマム"),
        ("inter-edu.com", "インターエデュ"),
        ("syutoken-mosi.co.jp", "首都圏模試センター"),
        ("yomiuri.co.jp", "読売新聞オンライン"),
        ("asahi.com", "朝日新聞デジタル"),
    ])
});

/// Look up the display label for an item URL.
///
/// The host is reduced to its last two dot-separated parts before the lookup
/// (so `www.resemom.jp` and `resemom.jp` both match), except for hosts like
/// `syutoken-mosi.co.jp` where three parts form the registrable domain.
/// Unparsable URLs and unmapped domains both produce the generic label.
pub fn source_label(url: &str) -> &'static str {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) else {
        debug!(%url, "Could not parse URL for source label");
        return GENERIC_SOURCE_LABEL;
    };

    let parts: Vec<&str> = host.split('.').collect();
    // Try the longest candidate suffixes first: "a.co.jp" before "co.jp".
    let max_take = parts.len().min(3);
    for take in (2..=max_take).rev() {
        let candidate = parts[parts.len() - take..].join(".");
        if let Some(label) = SOURCE_LABELS.get(candidate.as_str()) {
            return label;
        }
    }

    GENERIC_SOURCE_LABEL
}
