//! Reading and writing the `new_news.json` hand-off file.
//!
//! The collect and update stages run as separate processes (often separate
//! CI steps), so the batch travels through a small JSON file: a UTF-8,
//! pretty-printed array of items in the same shape the store uses.

use crate::models::NewsItem;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Write a collected batch to `path`, pretty-printed for easy inspection.
#[instrument(level = "info", skip_all, fields(path = %path, count = items.len()))]
pub async fn write_batch(path: &str, items: &[NewsItem]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(items)?;
    fs::write(path, json).await?;
    info!("Wrote batch file");
    Ok(())
}

/// Read a batch file back into items.
///
/// An unreadable or malformed file is an error; the updater treats it as a
/// terminal fault rather than guessing. An empty array is valid and maps to
/// the documented no-op outcome downstream.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn read_batch(path: &str) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let items: Vec<NewsItem> = serde_json::from_str(&raw)?;
    info!(count = items.len(), "Read batch file");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[tokio::test]
    async fn test_batch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new_news.json");
        let path = path.to_str().unwrap();

        let items = vec![NewsItem {
            id: Some(300),
            title: "タイトル".to_string(),
            summary: "要約".to_string(),
            date: "2025-11-04".to_string(),
            category: Category::School,
            source: "リセマム".to_string(),
            url: "https://resemom.jp/a".to_string(),
        }];

        write_batch(path, &items).await.unwrap();
        let back = read_batch(path).await.unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].url, items[0].url);
        assert_eq!(back[0].category, Category::School);
    }

    #[tokio::test]
    async fn test_read_batch_missing_file_is_error() {
        assert!(read_batch("/nonexistent/new_news.json").await.is_err());
    }

    #[tokio::test]
    async fn test_read_batch_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        tokio::fs::write(&path, "[]").await.unwrap();
        let items = read_batch(path.to_str().unwrap()).await.unwrap();
        assert!(items.is_empty());
    }
}
