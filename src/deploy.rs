//! Publishing the rewritten asset to the web host.
//!
//! Deployment is a narrow capability: hand the host the final bytes, get an
//! ack or a failure back. Nothing in the pipeline depends on how the bytes
//! travel, so the transport sits behind [`Publisher`] and the binary only
//! ever calls `publish`. Re-running a deploy with the same bytes is safe;
//! the endpoint replaces the file wholesale.

use crate::config::PublisherConfig;
use std::error::Error;
use tracing::{info, instrument, warn};

/// A narrow, idempotent upload capability.
pub trait Publisher {
    /// Upload the asset bytes under `remote_name`, replacing any previous
    /// version. Returns once the host has acknowledged the write.
    async fn publish(&self, remote_name: &str, bytes: &[u8]) -> Result<(), Box<dyn Error>>;
}

/// [`Publisher`] over an authenticated HTTP endpoint.
///
/// The asset is `PUT` to `{endpoint}/{remote_name}` with a bearer token; any
/// non-success status is a failure.
pub struct HttpPublisher {
    http: reqwest::Client,
    config: PublisherConfig,
}

impl HttpPublisher {
    pub fn new(config: PublisherConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl Publisher for HttpPublisher {
    #[instrument(level = "info", skip(self, bytes), fields(remote_name = %remote_name, bytes = bytes.len()))]
    async fn publish(&self, remote_name: &str, bytes: &[u8]) -> Result<(), Box<dyn Error>> {
        let url = format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            remote_name
        );

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.config.token)
            .body(bytes.to_vec())
            .send()
            .await?;

        if let Err(e) = response.error_for_status_ref() {
            warn!(status = %response.status(), "Upload rejected by host");
            return Err(e.into());
        }

        info!("Upload acknowledged");
        Ok(())
    }
}
