//! Command-line interface definitions for the three pipeline stages.
//!
//! Each stage is an independent binary with its own argument struct. All
//! credentials can be provided via environment variables; a missing required
//! credential fails argument parsing before any work begins, which is the
//! pipeline's configuration-error contract.

use clap::Parser;

/// Arguments for `collect_news`, the search-and-summarize stage.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment
/// collect_news -o new_news.json
///
/// # Override the query set and widen the recency window
/// collect_news --query "中学受験 入試" --query "私立中学 偏差値" --days-back 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CollectArgs {
    /// Google Custom Search API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: String,

    /// Google Custom Search engine identifier
    #[arg(long, env = "GOOGLE_SEARCH_ENGINE_ID", hide_env_values = true)]
    pub google_search_engine_id: String,

    /// Anthropic API key for summarization
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: String,

    /// Search query (repeatable); defaults to the built-in query set
    #[arg(long = "query")]
    pub queries: Vec<String>,

    /// Recency window in days passed to the search API
    #[arg(long, default_value_t = 1)]
    pub days_back: u32,

    /// Maximum results requested per query
    #[arg(long, default_value_t = 5)]
    pub results_per_query: u32,

    /// Model used for summarization
    #[arg(long, env = "SUMMARY_MODEL", default_value = "claude-sonnet-4-20250514")]
    pub model: String,

    /// Path of the batch file to write
    #[arg(short, long, default_value = "new_news.json")]
    pub output: String,
}

/// Arguments for `update_site`, the merge stage.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct UpdateArgs {
    /// Path of the site asset holding the newsData array
    #[arg(short, long, default_value = "script.js")]
    pub script: String,

    /// Path of the batch file produced by collect_news
    #[arg(short, long, default_value = "new_news.json")]
    pub batch: String,

    /// Maximum number of items retained in the store
    #[arg(long, default_value_t = crate::store::DEFAULT_MAX_ITEMS)]
    pub max_items: usize,

    /// Fail instead of starting from an empty store when the newsData
    /// array cannot be located or parsed
    #[arg(long)]
    pub require_existing: bool,
}

/// Arguments for `deploy_site`, the upload stage.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct DeployArgs {
    /// Path of the asset to upload
    #[arg(short, long, default_value = "script.js")]
    pub script: String,

    /// Upload endpoint the asset is PUT to
    #[arg(long, env = "PUBLISH_URL")]
    pub publish_url: String,

    /// Bearer token for the upload endpoint
    #[arg(long, env = "PUBLISH_TOKEN", hide_env_values = true)]
    pub publish_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_args_parsing() {
        let args = CollectArgs::parse_from([
            "collect_news",
            "--google-api-key",
            "k",
            "--google-search-engine-id",
            "cx",
            "--anthropic-api-key",
            "a",
            "--query",
            "中学受験 入試",
            "--days-back",
            "3",
        ]);

        assert_eq!(args.queries, vec!["中学受験 入試"]);
        assert_eq!(args.days_back, 3);
        assert_eq!(args.results_per_query, 5);
        assert_eq!(args.output, "new_news.json");
    }

    #[test]
    fn test_update_args_defaults() {
        let args = UpdateArgs::parse_from(["update_site"]);
        assert_eq!(args.script, "script.js");
        assert_eq!(args.batch, "new_news.json");
        assert_eq!(args.max_items, 250);
        assert!(!args.require_existing);
    }

    #[test]
    fn test_update_args_short_flags() {
        let args = UpdateArgs::parse_from(["update_site", "-s", "/srv/site/script.js", "-b", "/tmp/batch.json"]);
        assert_eq!(args.script, "/srv/site/script.js");
        assert_eq!(args.batch, "/tmp/batch.json");
    }
}
