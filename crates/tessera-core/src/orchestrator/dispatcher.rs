//! Stage dispatch with per-attempt timeout and bounded linear-backoff retries.
//!
//! Only transient runner conditions (`Unavailable`, `ResourceExhausted`,
//! `Aborted`) are retried. A deadline or a cancellation ends the dispatch
//! immediately.

use std::sync::Arc;
use std::time::Duration;

use tessera_types::config::OrchestratorConfig;
use tessera_types::error::StageError;
use tessera_types::stage::{StageRequest, StageResult};
use tokio_util::sync::CancellationToken;

use crate::stage::StageRunner;

/// Per-attempt timeout used when none is configured.
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Normalised retry settings for stage dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, always at least 1.
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    /// Base backoff; attempt `k` is followed by a wait of `k * retry_delay`.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Build a policy from raw settings. Negative retries and delays clamp to
    /// zero; a zero timeout selects `DEFAULT_STAGE_TIMEOUT`.
    pub fn new(retries: i64, attempt_timeout: Duration, retry_delay_ms: i64) -> Self {
        let retries = u32::try_from(retries.max(0)).unwrap_or(u32::MAX - 1);
        let attempt_timeout = if attempt_timeout.is_zero() {
            DEFAULT_STAGE_TIMEOUT
        } else {
            attempt_timeout
        };
        Self {
            max_attempts: retries.saturating_add(1),
            attempt_timeout,
            retry_delay: Duration::from_millis(retry_delay_ms.max(0) as u64),
        }
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(
            config.stage_retries,
            Duration::from_secs(config.stage_timeout_secs),
            config.stage_retry_delay_ms,
        )
    }

    /// Wait after the failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&OrchestratorConfig::default())
    }
}

// ---------------------------------------------------------------------------
// StageDispatcher
// ---------------------------------------------------------------------------

/// Issues stage requests against a runner under a `RetryPolicy`.
pub struct StageDispatcher<R: StageRunner> {
    runner: Arc<R>,
    policy: RetryPolicy,
}

impl<R: StageRunner> StageDispatcher<R> {
    pub fn new(runner: Arc<R>, policy: RetryPolicy) -> Self {
        Self { runner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `request`, retrying transient failures.
    ///
    /// `on_retry(attempt, max_attempts)` fires once before each backoff wait.
    /// Cancelling `cancel` aborts both an in-flight attempt and a backoff wait.
    pub async fn run_with_retries(
        &self,
        cancel: &CancellationToken,
        request: &StageRequest,
        mut on_retry: impl FnMut(u32, u32),
    ) -> Result<StageResult, StageError> {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 1;

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(StageError::Cancelled),
                result = tokio::time::timeout(
                    self.policy.attempt_timeout,
                    self.runner.run_stage(request),
                ) => result.unwrap_or(Err(StageError::DeadlineExceeded)),
            };

            let err = match outcome {
                Ok(result) => return Ok(result),
                Err(err) => err,
            };

            if !Self::is_retryable(&err) || attempt >= max_attempts {
                return Err(err);
            }

            on_retry(attempt, max_attempts);
            tracing::warn!(
                stage_id = %request.stage_id,
                attempt,
                max_attempts,
                error = %err,
                "stage attempt failed, retrying"
            );

            let delay = self.policy.backoff(attempt);
            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(StageError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            attempt += 1;
        }
    }

    /// Whether a failure is transient and safe to re-attempt.
    pub fn is_retryable(err: &StageError) -> bool {
        matches!(
            err,
            StageError::Unavailable(_) | StageError::ResourceExhausted(_) | StageError::Aborted(_)
        )
    }

    /// Job message for a dispatch failure. Deadlines name the configured
    /// per-attempt timeout.
    pub fn failure_message(&self, err: &StageError) -> String {
        match err {
            StageError::DeadlineExceeded => format!(
                "stage timed out after {}",
                format_timeout(self.policy.attempt_timeout)
            ),
            other => other.to_string(),
        }
    }
}

/// Render a duration compactly: `2m0s`, `1h2m3s`, `1.5s`, `250ms`.
pub fn format_timeout(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}{}µs", nanos / 1_000, fraction(nanos % 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}{}ms", nanos / 1_000_000, fraction(nanos % 1_000_000, 6));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let secs = format!("{seconds}{}s", fraction(u128::from(duration.subsec_nanos()), 9));

    if hours > 0 {
        format!("{hours}h{minutes}m{secs}")
    } else if minutes > 0 {
        format!("{minutes}m{secs}")
    } else {
        secs
    }
}

fn fraction(value: u128, width: usize) -> String {
    if value == 0 {
        return String::new();
    }
    let digits = format!("{value:0width$}");
    format!(".{}", digits.trim_end_matches('0'))
}
