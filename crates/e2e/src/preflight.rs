//! Reachability check of the storefront before a live run

use std::time::Duration;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};

/// Issue one GET to `url` and require a successful status.
///
/// There is no retry: an unreachable target fails the run before any
/// browser is started.
pub async fn check_reachable(url: &str, timeout: Duration) -> E2eResult<()> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    debug!("Preflight GET {}", url);
    let unreachable = |reason: String| E2eError::TargetUnreachable {
        url: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unreachable(format!("status {}", status)));
    }

    info!("Target {} is up ({})", url, status);
    Ok(())
}
