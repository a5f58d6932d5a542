//! LLM summarization with exponential backoff retry logic.
//!
//! Each collected item is summarized for parents in 100 characters or less
//! through the Anthropic Messages API. The module is built around a small
//! trait so retry behavior stays a decorator:
//!
//! - [`AskAsync`]: core trait defining an async prompt/response exchange
//! - [`MessagesClient`]: [`AskAsync`] over the Messages HTTP endpoint
//! - [`RetryAsk`]: decorator adding exponential backoff to any [`AskAsync`]
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//!
//! When every attempt fails, the caller substitutes [`fallback_summary`],
//! a deterministic truncation of the snippet, so the run never stalls on a
//! summarization outage.

use crate::config::SummarizerConfig;
use rand::{rng, Rng};
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

const MESSAGES_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its response. The
/// abstraction exists so decorators (retry logic, test doubles) can wrap any
/// backend.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send a prompt and receive a response.
    async fn ask(&self, prompt: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`]
/// implementation.
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Wrap an existing [`AskAsync`] implementation.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, prompt: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(prompt).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// [`AskAsync`] over the Anthropic Messages endpoint.
///
/// Borrows the HTTP client and config so one client is shared across the
/// whole run.
#[derive(Debug)]
pub struct MessagesClient<'a> {
    pub http: &'a reqwest::Client,
    pub config: &'a SummarizerConfig,
}

impl<'a> AskAsync for MessagesClient<'a> {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, prompt: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = json!({
            "model": self.config.model,
            "max_tokens": 200,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let result = async {
            let response = self
                .http
                .post(MESSAGES_ENDPOINT)
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;

            let parsed: MessagesResponse = response.json().await?;
            let text = parsed
                .content
                .into_iter()
                .map(|block| block.text)
                .find(|text| !text.is_empty())
                .ok_or("model response contained no text")?;

            Ok::<String, Box<dyn Error>>(text.trim().to_string())
        }
        .await;

        let dt = t0.elapsed();
        if let Err(e) = &result {
            warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "Messages API call failed");
        }
        result
    }
}

/// Build the summarization prompt for one item.
pub fn build_prompt(title: &str, snippet: &str, source: &str) -> String {
    format!(
        "以下の中学受験ニュースを、保護者向けに100文字以内で要約してください。\n\
         重要なポイントを簡潔にまとめてください。\n\n\
         タイトル: {title}\n\
         内容: {snippet}\n\
         情報源: {source}\n\n\
         要約（100文字以内）:"
    )
}

/// Summarize one item with retry.
///
/// - Up to 5 retry attempts
/// - Exponential backoff: 1s, 2s, 4s, 8s, 16s (capped at 30s)
/// - Random jitter added to prevent thundering herd
///
/// Callers handle the final error by substituting [`fallback_summary`].
#[instrument(level = "info", skip_all, fields(title = %title))]
pub async fn summarize_with_backoff(
    http: &reqwest::Client,
    config: &SummarizerConfig,
    title: &str,
    snippet: &str,
    source: &str,
) -> Result<String, Box<dyn Error>> {
    let t0 = Instant::now();
    let client = MessagesClient { http, config };
    let api = RetryAsk::new(client, 5, StdDuration::from_secs(1));
    let res = api.ask(&build_prompt(title, snippet, source)).await;
    let dt = t0.elapsed();

    match &res {
        Ok(_) => info!(
            elapsed_ms_total = dt.as_millis() as u128,
            "summarize_with_backoff succeeded"
        ),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "summarize_with_backoff failed")
        }
    }
    res
}

/// Deterministic fallback summary: the first `max_chars` characters of the
/// snippet plus an ellipsis. Character-based so multi-byte text is never
/// split mid-codepoint.
pub fn fallback_summary(snippet: &str, max_chars: usize) -> String {
    let mut summary: String = snippet.chars().take(max_chars).collect();
    summary.push_str("...");
    summary
}
