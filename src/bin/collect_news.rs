//! Stage 1: collect fresh news into a batch file.
//!
//! Runs each configured search query against the Custom Search API,
//! summarizes every new hit through the Messages API, classifies it, and
//! writes the finished batch to `new_news.json` for the update stage.
//!
//! Collaborator failures are contained per call: a failed query contributes
//! zero candidates, a failed summarization falls back to a snippet
//! truncation, and the run keeps going either way. Only missing credentials
//! (caught by argument parsing) and an unwritable batch file end the run
//! with a non-zero status.

use clap::Parser;
use futures::stream::{self, StreamExt};
use juken_news::cli::CollectArgs;
use juken_news::config::{self, SearchConfig, SummarizerConfig};
use juken_news::models::{NewsItem, ID_OFFSET};
use juken_news::search::{SearchClient, SearchHit};
use juken_news::utils::{today_string, truncate_for_log};
use juken_news::{batch, categorize, sources, summarize};
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("collect_news starting up");

    let args = CollectArgs::parse();
    let queries = config::effective_queries(&args);
    let search = SearchClient::new(SearchConfig::from_args(&args));
    let summarizer_config = SummarizerConfig::from_args(&args);
    let http = reqwest::Client::new();
    let today = today_string();

    debug!(queries = queries.len(), days_back = args.days_back, "Collector configured");

    // ---- Gather candidates across all queries ----
    let mut candidates: Vec<SearchHit> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for query in &queries {
        info!(query = %truncate_for_log(query, 50), "Searching");
        for hit in search.search_or_empty(query).await {
            // Queries overlap in site filters, so the same article can come
            // back more than once per run.
            if seen_urls.insert(hit.link.clone()) {
                candidates.push(hit);
            } else {
                debug!(url = %hit.link, "Already collected this run; skipping");
            }
        }
    }
    info!(count = candidates.len(), "Candidates gathered");

    // ---- Summarize and classify, one item at a time ----
    let http_ref = &http;
    let summarizer_ref = &summarizer_config;
    let collected: Vec<NewsItem> = stream::iter(candidates.into_iter().enumerate())
        .then(|(i, hit)| {
            let today = today.clone();
            async move {
                info!(title = %truncate_for_log(&hit.title, 50), "Summarizing");
                let summary = match summarize::summarize_with_backoff(
                    http_ref,
                    summarizer_ref,
                    &hit.title,
                    &hit.snippet,
                    &hit.display_link,
                )
                .await
                {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(error = %e, "Summarization failed; using snippet fallback");
                        summarize::fallback_summary(&hit.snippet, summarizer_ref.max_summary_chars)
                    }
                };

                let item = NewsItem {
                    id: Some(i as u32 + ID_OFFSET),
                    category: categorize::categorize(&hit.title, &hit.snippet),
                    source: sources::source_label(&hit.link).to_string(),
                    title: hit.title,
                    summary,
                    date: today,
                    url: hit.link,
                };
                info!(
                    title = %truncate_for_log(&item.title, 50),
                    category = %item.category,
                    source = %item.source,
                    "Collected item"
                );
                item
            }
        })
        .collect()
        .await;

    info!(count = collected.len(), "Collection finished");
    batch::write_batch(&args.output, &collected).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        count = collected.len(),
        path = %args.output,
        "Execution complete"
    );

    Ok(())
}
