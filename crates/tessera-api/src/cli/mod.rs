//! CLI command definitions and dispatch for the `tessera` binary.

pub mod nodes;
pub mod serve;
pub mod translate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tessera_types::config::OrchestratorConfig;

/// Workflow orchestrator for a single-stage image generation backend.
#[derive(Parser)]
#[command(name = "tessera", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (defaults to ./config.toml when present).
    #[arg(long, global = true, env = "TESSERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the orchestrator HTTP service.
    Serve(ServeArgs),

    /// Print the node catalog as JSON.
    Nodes,

    /// Translate a workflow graph file and print the resulting stage request.
    Translate {
        /// Path to a graph JSON file (`{"nodes": [...]}`).
        file: PathBuf,
    },
}

/// Overrides for `serve`. Each flag also reads its environment variable and
/// takes precedence over config.toml.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// Base URL of the stage runner.
    #[arg(long, env = "STAGE_SAMPLER_ADDR")]
    pub stage_addr: Option<String>,

    /// Artifacts root shared with the stage runner.
    #[arg(long, env = "ARTIFACTS_ROOT")]
    pub artifacts_root: Option<String>,

    /// Per-attempt stage timeout in seconds (0 = default).
    #[arg(long, env = "STAGE_TIMEOUT_SECS")]
    pub stage_timeout_secs: Option<u64>,

    /// Retries after the first stage attempt.
    #[arg(long, env = "STAGE_MAX_RETRIES", allow_negative_numbers = true)]
    pub stage_retries: Option<i64>,

    /// Base retry delay in milliseconds (linear backoff).
    #[arg(long, env = "STAGE_RETRY_DELAY_MS", allow_negative_numbers = true)]
    pub stage_retry_delay_ms: Option<i64>,

    /// How long to wait for the stage runner at startup, in seconds.
    #[arg(long, env = "STAGE_HEALTH_TIMEOUT_SECS")]
    pub stage_health_timeout_secs: Option<u64>,

    /// Interval between startup health probes, in milliseconds.
    #[arg(long, env = "STAGE_HEALTH_INTERVAL_MS")]
    pub stage_health_interval_ms: Option<u64>,

    /// Timeout for each startup health probe, in seconds.
    #[arg(long, env = "STAGE_HEALTH_REQUEST_TIMEOUT_SECS")]
    pub stage_health_request_timeout_secs: Option<u64>,

    /// Start serving without waiting for the stage runner.
    #[arg(long)]
    pub skip_health_check: bool,
}

impl ServeArgs {
    /// Layer the flags that were given over `config`.
    pub fn apply(&self, config: &mut OrchestratorConfig) {
        if let Some(v) = &self.listen_addr {
            config.listen_addr = v.clone();
        }
        if let Some(v) = &self.stage_addr {
            config.stage_addr = v.clone();
        }
        if let Some(v) = &self.artifacts_root {
            config.artifacts_root = v.clone();
        }
        if let Some(v) = self.stage_timeout_secs {
            config.stage_timeout_secs = v;
        }
        if let Some(v) = self.stage_retries {
            config.stage_retries = v;
        }
        if let Some(v) = self.stage_retry_delay_ms {
            config.stage_retry_delay_ms = v;
        }
        if let Some(v) = self.stage_health_timeout_secs {
            config.stage_health_timeout_secs = v;
        }
        if let Some(v) = self.stage_health_interval_ms {
            config.stage_health_interval_ms = v;
        }
        if let Some(v) = self.stage_health_request_timeout_secs {
            config.stage_health_request_timeout_secs = v;
        }
    }
}
