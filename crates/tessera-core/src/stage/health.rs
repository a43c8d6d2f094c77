//! Startup readiness wait for the stage runner.
//!
//! The orchestrator refuses to serve until the runner answers a health probe.
//! Probes repeat on a fixed interval until one succeeds or the overall
//! timeout elapses; the last probe error is carried in the failure.

use std::time::Duration;

use tessera_types::config::{
    default_stage_health_interval_ms, default_stage_health_request_timeout_secs,
};
use tessera_types::error::StageError;
use tessera_types::stage::HealthResponse;
use thiserror::Error;
use tokio::time::Instant;

use super::StageRunner;

/// Deadline horizon used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("stage runner not healthy after {timeout:?}, last error: {last_error}")]
    TimedOut {
        timeout: Duration,
        last_error: StageError,
    },
}

/// Probe `runner` until it reports healthy or `timeout` elapses.
///
/// A zero `interval` or `request_timeout` selects the default (2s and 5s).
/// Each probe is bounded by `request_timeout` and by the time remaining.
pub async fn wait_for_stage_health<R: StageRunner>(
    runner: &R,
    timeout: Duration,
    interval: Duration,
    request_timeout: Duration,
) -> Result<HealthResponse, HealthError> {
    let interval = if interval.is_zero() {
        Duration::from_millis(default_stage_health_interval_ms())
    } else {
        interval
    };
    let request_timeout = if request_timeout.is_zero() {
        Duration::from_secs(default_stage_health_request_timeout_secs())
    } else {
        request_timeout
    };

    let now = Instant::now();
    let deadline = now.checked_add(timeout).unwrap_or(now + FAR_FUTURE);
    tracing::info!(?timeout, "waiting for stage runner health");

    loop {
        let budget = request_timeout.min(deadline.saturating_duration_since(Instant::now()));
        let outcome = match tokio::time::timeout(budget, runner.health()).await {
            Ok(result) => result,
            Err(_) => Err(StageError::DeadlineExceeded),
        };

        let last_error = match outcome {
            Ok(response) => {
                tracing::info!(status = %response.status, "stage runner is healthy");
                return Ok(response);
            }
            Err(err) => {
                tracing::warn!(error = %err, "stage runner health check failed");
                err
            }
        };

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                return Err(HealthError::TimedOut { timeout, last_error });
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
