//! Stage 3: upload the rewritten asset to the web host.
//!
//! Reads the local asset and hands its bytes to the configured publisher.
//! Missing credentials fail argument parsing; a missing local asset or a
//! rejected upload ends the run with a non-zero status. Re-running a
//! successful deploy uploads identical bytes and is harmless.

use clap::Parser;
use juken_news::cli::DeployArgs;
use juken_news::config::PublisherConfig;
use juken_news::deploy::{HttpPublisher, Publisher};
use std::error::Error;
use std::path::Path;
use tracing::{error, info};
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
    info!("deploy_site starting up");

    let args = DeployArgs::parse();
    let publisher = HttpPublisher::new(PublisherConfig::from_args(&args));

    let bytes = match tokio::fs::read(&args.script).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path = %args.script, error = %e, "Cannot read asset to deploy");
            return Err(e.into());
        }
    };

    let remote_name = Path::new(&args.script)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "script.js".to_string());

    info!(remote_name = %remote_name, bytes = bytes.len(), "Uploading asset");
    if let Err(e) = publisher.publish(&remote_name, &bytes).await {
        error!(remote_name = %remote_name, error = %e, "Upload failed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(remote_name = %remote_name, ?elapsed, "Deploy complete");

    Ok(())
}
