//! Orchestrator configuration types.
//!
//! `OrchestratorConfig` mirrors the optional `config.toml` read at startup.
//! Every field has a default, so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the orchestrator process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Address the HTTP transport binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Base URL of the stage runner.
    #[serde(default = "default_stage_addr")]
    pub stage_addr: String,

    /// Root directory the stage runner writes artifacts under.
    ///
    /// Informational only: it is logged at startup and never read back. The
    /// stage runner owns artifact placement and reports the final location
    /// in its output URI.
    #[serde(default = "default_artifacts_root")]
    pub artifacts_root: String,

    /// Per-attempt stage timeout. Zero selects the default.
    #[serde(default = "default_stage_timeout_secs")]
    pub stage_timeout_secs: u64,

    /// Retries after the first attempt. Negative values clamp to zero.
    #[serde(default = "default_stage_retries")]
    pub stage_retries: i64,

    /// Base delay between retries; attempt `k` waits `k * delay`.
    /// Negative values clamp to zero.
    #[serde(default = "default_stage_retry_delay_ms")]
    pub stage_retry_delay_ms: i64,

    /// Maximum time to wait for the stage runner to report healthy at startup.
    #[serde(default = "default_stage_health_timeout_secs")]
    pub stage_health_timeout_secs: u64,

    /// Interval between startup health probes.
    #[serde(default = "default_stage_health_interval_ms")]
    pub stage_health_interval_ms: u64,

    /// Timeout applied to each health probe.
    #[serde(default = "default_stage_health_request_timeout_secs")]
    pub stage_health_request_timeout_secs: u64,

    /// Cadence of `StreamStatus` snapshots.
    #[serde(default = "default_stream_interval_ms")]
    pub stream_interval_ms: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:9090".to_string()
}

fn default_stage_addr() -> String {
    "http://stage-sampler:9091".to_string()
}

fn default_artifacts_root() -> String {
    "/artifacts".to_string()
}

pub fn default_stage_timeout_secs() -> u64 {
    120
}

fn default_stage_retries() -> i64 {
    2
}

fn default_stage_retry_delay_ms() -> i64 {
    2_000
}

fn default_stage_health_timeout_secs() -> u64 {
    120
}

pub fn default_stage_health_interval_ms() -> u64 {
    2_000
}

pub fn default_stage_health_request_timeout_secs() -> u64 {
    5
}

fn default_stream_interval_ms() -> u64 {
    1_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            stage_addr: default_stage_addr(),
            artifacts_root: default_artifacts_root(),
            stage_timeout_secs: default_stage_timeout_secs(),
            stage_retries: default_stage_retries(),
            stage_retry_delay_ms: default_stage_retry_delay_ms(),
            stage_health_timeout_secs: default_stage_health_timeout_secs(),
            stage_health_interval_ms: default_stage_health_interval_ms(),
            stage_health_request_timeout_secs: default_stage_health_request_timeout_secs(),
            stream_interval_ms: default_stream_interval_ms(),
        }
    }
}
