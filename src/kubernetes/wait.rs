// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Polling with exponential backoff, bounded by a deadline and a cancellation
//! token.

use crate::constants::verify::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::{OutfitterError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Repeatedly run `check` until it reports `true`.
///
/// Errors from `check` are logged and retried. Returns `Ok(false)` when the
/// timeout elapses, including while a check is still running, and
/// `Cancelled` when the token fires.
pub async fn wait_until<F, Fut>(
    what: &str,
    timeout: Duration,
    cancel: &CancellationToken,
    mut check: F,
) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OutfitterError::Cancelled),
            outcome = check() => outcome,
            _ = sleep_until(deadline) => {
                warn!("Timed out waiting for {} while a check was in flight", what);
                return Ok(false);
            }
        };

        match outcome {
            Ok(true) => {
                info!("{} is ready", what);
                return Ok(true);
            }
            Ok(false) => {
                info!("{} not yet ready, waiting {} seconds...", what, interval);
            }
            Err(e) => {
                warn!(
                    "Error checking {}: {}, retrying in {} seconds...",
                    what, e, interval
                );
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        let pause = Duration::from_secs(interval).min(deadline - now);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(OutfitterError::Cancelled),
            _ = sleep(pause) => {}
        }

        // Exponential backoff with max cap
        interval = (interval * 2).min(POLL_MAX_INTERVAL_SECS);
    }
}
