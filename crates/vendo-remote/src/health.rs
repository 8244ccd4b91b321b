//! Reconnect policy for front-ends.
//!
//! The gateway itself never retries. When a call fails with a connectivity
//! error, the glue layer polls the service's health endpoint until it
//! answers, then retries the original call exactly once. Application
//! errors (validation, mode, not-found) are never retried.

use std::time::Duration;
use tracing::{info, warn};
use vendo_core::{Result, constants::HEALTH_POLL_INTERVAL};

/// Probe the service's `/health` endpoint once.
pub async fn ping(base_url: &str) -> bool {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(HEALTH_POLL_INTERVAL))
        .build()
    {
        Ok(client) => client,
        Err(_) => return false,
    };

    match client.get(format!("{base_url}/health")).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Poll the health endpoint until the service answers.
pub async fn wait_until_reachable(base_url: &str) {
    let interval = Duration::from_millis(HEALTH_POLL_INTERVAL);
    loop {
        if ping(base_url).await {
            info!(%base_url, "remote service reachable");
            return;
        }
        warn!(%base_url, "remote service unreachable, reconnecting");
        tokio::time::sleep(interval).await;
    }
}

/// Run `op`; on a connectivity failure, wait for the service to come back
/// and retry exactly once.
///
/// # Errors
/// Propagates any non-connectivity error immediately, and whatever the
/// single retry returns.
pub async fn retry_once_after_reconnect<T, F>(base_url: &str, mut op: F) -> Result<T>
where
    F: AsyncFnMut() -> Result<T>,
{
    match op().await {
        Err(e) if e.is_connectivity() => {
            warn!(error = %e, "remote call failed, waiting for service");
            wait_until_reachable(base_url).await;
            op().await
        }
        other => other,
    }
}
