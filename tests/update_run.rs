// tests/update_run.rs
//
// End-to-end update runs against a real script.js on disk, exercising the
// same read -> decode -> apply -> encode -> write sequence the update_site
// binary performs.

use juken_news::models::{Category, NewsItem};
use juken_news::store::{self, apply_update};
use juken_news::{batch, store::DEFAULT_MAX_ITEMS};
use std::path::Path;

const SEED_ASSET: &str = r#"// chugaku news site
const pageSize = 10;

const newsData = [
    {
        'title': '種記事',
        'summary': '最初から入っている記事。',
        'date': '2025-10-01',
        'category': 'school',
        'source': 'インターエデュ',
        'url': 'https://www.inter-edu.com/article/seed/'
    }
];

function renderNews() {
    console.log('rendering');
}
"#;

fn fresh_item(url: &str, id: u32) -> NewsItem {
    NewsItem {
        id: Some(id),
        title: format!("新着 {id}"),
        summary: "新しく収集した記事。".to_string(),
        date: "2025-11-04".to_string(),
        category: Category::Entrance,
        source: "リセマム".to_string(),
        url: url.to_string(),
    }
}

async fn run_update(script: &Path, batch_path: &Path, max_items: usize) -> store::UpdateOutcome {
    let new_items = batch::read_batch(batch_path.to_str().unwrap()).await.unwrap();
    let blob = tokio::fs::read_to_string(script).await.unwrap();
    let existing = store::decode(&blob).unwrap_or_default();
    let outcome = apply_update(existing, new_items, max_items);
    if !outcome.is_noop() {
        let updated = store::encode(&blob, &outcome.items).unwrap();
        tokio::fs::write(script, updated).await.unwrap();
    }
    outcome
}

#[tokio::test]
async fn update_run_merges_batch_into_asset() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.js");
    let batch_path = dir.path().join("new_news.json");
    tokio::fs::write(&script, SEED_ASSET).await.unwrap();

    let items = vec![
        fresh_item("https://resemom.jp/article/300", 300),
        fresh_item("https://resemom.jp/article/301", 301),
    ];
    batch::write_batch(batch_path.to_str().unwrap(), &items).await.unwrap();

    let outcome = run_update(&script, &batch_path, DEFAULT_MAX_ITEMS).await;
    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.evicted, 0);

    let rewritten = tokio::fs::read_to_string(&script).await.unwrap();
    let stored = store::decode(&rewritten).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].url, "https://resemom.jp/article/300");
    assert_eq!(stored[2].url, "https://www.inter-edu.com/article/seed/");

    // everything around the array is still there
    assert!(rewritten.starts_with("// chugaku news site"));
    assert!(rewritten.contains("function renderNews()"));
    assert!(rewritten.contains("console.log('rendering');"));
}

#[tokio::test]
async fn second_identical_run_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.js");
    let batch_path = dir.path().join("new_news.json");
    tokio::fs::write(&script, SEED_ASSET).await.unwrap();

    let items = vec![fresh_item("https://resemom.jp/article/300", 300)];
    batch::write_batch(batch_path.to_str().unwrap(), &items).await.unwrap();

    let first = run_update(&script, &batch_path, DEFAULT_MAX_ITEMS).await;
    assert_eq!(first.added, 1);
    let after_first = tokio::fs::read_to_string(&script).await.unwrap();

    let second = run_update(&script, &batch_path, DEFAULT_MAX_ITEMS).await;
    assert!(second.is_noop());
    let after_second = tokio::fs::read_to_string(&script).await.unwrap();
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn missing_store_region_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.js");
    let batch_path = dir.path().join("new_news.json");
    tokio::fs::write(&script, "// no newsData here\nconst x = 1;\n").await.unwrap();

    let items = vec![fresh_item("https://resemom.jp/article/300", 300)];
    batch::write_batch(batch_path.to_str().unwrap(), &items).await.unwrap();

    // decode fails, the run continues from an empty store; writing then
    // fails because there is no region to splice into
    let new_items = batch::read_batch(batch_path.to_str().unwrap()).await.unwrap();
    let blob = tokio::fs::read_to_string(&script).await.unwrap();
    assert!(matches!(store::decode(&blob), Err(store::CodecError::RegionNotFound)));

    let outcome = apply_update(Vec::new(), new_items, DEFAULT_MAX_ITEMS);
    assert_eq!(outcome.added, 1);
    assert!(matches!(
        store::encode(&blob, &outcome.items),
        Err(store::CodecError::RegionNotFound)
    ));
}

#[tokio::test]
async fn eviction_applies_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.js");
    let batch_path = dir.path().join("new_news.json");
    tokio::fs::write(&script, SEED_ASSET).await.unwrap();

    let first_batch: Vec<NewsItem> = (0..3)
        .map(|i| fresh_item(&format!("https://resemom.jp/a/{i}"), 300 + i))
        .collect();
    batch::write_batch(batch_path.to_str().unwrap(), &first_batch).await.unwrap();
    run_update(&script, &batch_path, 4).await;

    let second_batch: Vec<NewsItem> = (0..2)
        .map(|i| fresh_item(&format!("https://resemom.jp/b/{i}"), 400 + i))
        .collect();
    batch::write_batch(batch_path.to_str().unwrap(), &second_batch).await.unwrap();
    let outcome = run_update(&script, &batch_path, 4).await;

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.evicted, 2);

    let stored = store::decode(&tokio::fs::read_to_string(&script).await.unwrap()).unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[0].url, "https://resemom.jp/b/0");
    assert_eq!(stored[1].url, "https://resemom.jp/b/1");
    // the seed article was the oldest and is gone
    assert!(stored.iter().all(|i| i.url != "https://www.inter-edu.com/article/seed/"));
}
