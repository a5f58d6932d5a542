//! Google Custom Search wrapper.
//!
//! One call per query against the Custom Search JSON API, restricted to a
//! recency window. A failed or empty query yields zero candidates rather
//! than failing the run; the collector just moves on to the next query.

use crate::config::SearchConfig;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// One raw search result, before summarization.
///
/// Hits without a link are dropped at the wire boundary; everything past
/// this type carries a non-empty URL.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub display_link: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawSearchItem>,
}

#[derive(Debug, Deserialize)]
struct RawSearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default, rename = "displayLink")]
    display_link: String,
}

/// Thin client over the Custom Search JSON API.
pub struct SearchClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Run one query, newest results first, within the configured window.
    ///
    /// Transport and HTTP-status errors propagate; use
    /// [`SearchClient::search_or_empty`] for the recovering variant the
    /// collector calls.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, Box<dyn Error>> {
        let date_restrict = format!("d{}", self.config.days_back);
        let num = self.config.results_per_query.to_string();
        let response = self
            .http
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.engine_id.as_str()),
                ("q", query),
                ("dateRestrict", date_restrict.as_str()),
                ("num", num.as_str()),
                ("sort", "date"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: SearchResponse = response.json().await?;

        let hits: Vec<SearchHit> = parsed
            .items
            .into_iter()
            .filter(|item| {
                if item.link.is_empty() {
                    warn!(title = %item.title, "Search hit without a link; dropping");
                    false
                } else {
                    true
                }
            })
            .map(|item| SearchHit {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
                display_link: item.display_link,
            })
            .collect();

        info!(count = hits.len(), "Search query returned hits");
        debug!(links = ?hits.iter().map(|h| h.link.as_str()).collect::<Vec<_>>(), "Hit links");
        Ok(hits)
    }

    /// Like [`SearchClient::search`], but a failure is logged and reported
    /// as zero candidates so one bad query cannot end the run.
    #[instrument(level = "info", skip(self))]
    pub async fn search_or_empty(&self, query: &str) -> Vec<SearchHit> {
        match self.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Search query failed; continuing with no candidates");
                Vec::new()
            }
        }
    }
}
