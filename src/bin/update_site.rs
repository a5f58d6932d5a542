//! Stage 2: merge the collected batch into the site asset.
//!
//! Reads the batch file and `script.js`, decodes the embedded store, runs
//! the dedup → merge → evict pipeline, and writes the rewritten asset back
//! in a single write. The asset is only touched when the batch actually
//! contributed items; a fully-duplicate batch is a successful no-op.
//!
//! An unlocatable or unparsable store is downgraded to an empty one (with a
//! warning) unless `--require-existing` is passed, in which case it is
//! fatal so CI can stop a deploy on a clobbered asset.

use clap::Parser;
use juken_news::batch;
use juken_news::cli::UpdateArgs;
use juken_news::store;
use std::error::Error;
use tracing::{error, info, warn};
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
    info!("update_site starting up");

    let args = UpdateArgs::parse();

    let new_items = batch::read_batch(&args.batch).await?;
    if new_items.is_empty() {
        info!(path = %args.batch, "Batch file is empty; nothing to merge");
        return Ok(());
    }

    let blob = tokio::fs::read_to_string(&args.script).await?;

    let existing = match store::decode(&blob) {
        Ok(items) => {
            info!(count = items.len(), "Loaded existing store");
            items
        }
        Err(e) if args.require_existing => {
            error!(error = %e, path = %args.script, "Existing store required but unreadable");
            return Err(e.into());
        }
        Err(e) => {
            warn!(error = %e, path = %args.script, "Could not read existing store; starting empty");
            Vec::new()
        }
    };

    let outcome = store::apply_update(existing, new_items, args.max_items);

    if outcome.is_noop() {
        info!(
            duplicates = outcome.duplicates,
            "No new items after dedup; asset left untouched"
        );
        return Ok(());
    }

    let updated = store::encode(&blob, &outcome.items)?;
    tokio::fs::write(&args.script, updated).await?;

    let elapsed = start_time.elapsed();
    info!(
        added = outcome.added,
        duplicates = outcome.duplicates,
        evicted = outcome.evicted,
        total = outcome.items.len(),
        path = %args.script,
        ?elapsed,
        "Store updated"
    );

    Ok(())
}
