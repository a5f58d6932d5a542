//! Typed configuration passed into each component at construction.
//!
//! Credentials arrive through CLI/environment arguments and are converted to
//! these structs once, at process start. Components receive a reference to
//! their config; nothing reads the environment after startup.

use crate::cli::{CollectArgs, DeployArgs};

/// Built-in query set for the collector. Each query is restricted to the
/// outlets the source-label table knows about.
pub fn default_queries() -> Vec<String> {
    vec![
        "中学受験 入試 site:diamond.jp OR site:resemom.jp OR site:inter-edu.com".to_string(),
        "中学校 説明会 site:resemom.jp OR site:inter-edu.com".to_string(),
        "私立中学 偏差値 site:syutoken-mosi.co.jp OR site:inter-edu.com".to_string(),
    ]
}

/// Configuration for the search collaborator.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub results_per_query: u32,
    pub days_back: u32,
}

/// Configuration for the summarization collaborator.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub model: String,
    /// Soft cap on summary length, also used by the fallback truncation.
    pub max_summary_chars: usize,
}

/// Configuration for the upload collaborator.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub endpoint: String,
    pub token: String,
}

impl SearchConfig {
    pub fn from_args(args: &CollectArgs) -> Self {
        Self {
            api_key: args.google_api_key.clone(),
            engine_id: args.google_search_engine_id.clone(),
            results_per_query: args.results_per_query,
            days_back: args.days_back,
        }
    }
}

impl SummarizerConfig {
    pub fn from_args(args: &CollectArgs) -> Self {
        Self {
            api_key: args.anthropic_api_key.clone(),
            model: args.model.clone(),
            max_summary_chars: 100,
        }
    }
}

impl PublisherConfig {
    pub fn from_args(args: &DeployArgs) -> Self {
        Self {
            endpoint: args.publish_url.clone(),
            token: args.publish_token.clone(),
        }
    }
}

/// The queries a collect run will execute: the CLI overrides when present,
/// the built-in set otherwise.
pub fn effective_queries(args: &CollectArgs) -> Vec<String> {
    if args.queries.is_empty() {
        default_queries()
    } else {
        args.queries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn collect_args(extra: &[&str]) -> CollectArgs {
        let mut argv = vec![
            "collect_news",
            "--google-api-key",
            "k",
            "--google-search-engine-id",
            "cx",
            "--anthropic-api-key",
            "a",
        ];
        argv.extend_from_slice(extra);
        CollectArgs::parse_from(argv)
    }

    #[test]
    fn test_effective_queries_default() {
        let args = collect_args(&[]);
        let queries = effective_queries(&args);
        assert_eq!(queries.len(), 3);
        assert!(queries[0].contains("中学受験"));
    }

    #[test]
    fn test_effective_queries_override() {
        let args = collect_args(&["--query", "custom"]);
        assert_eq!(effective_queries(&args), vec!["custom"]);
    }

    #[test]
    fn test_summarizer_config_from_args() {
        let args = collect_args(&[]);
        let conf = SummarizerConfig::from_args(&args);
        assert_eq!(conf.model, "claude-sonnet-4-20250514");
        assert_eq!(conf.max_summary_chars, 100);
    }
}
