//! Tessera orchestrator entry point.
//!
//! Binary name: `tessera`
//!
//! Parses CLI arguments, initializes tracing and configuration, then
//! dispatches to the command handler. `tessera serve` starts the HTTP
//! transport in front of the orchestrator service.

mod cli;
mod http;
mod state;

use clap::Parser;
use tessera_observe::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default filter from verbosity; RUST_LOG overrides.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,tessera=debug",
        _ => "trace",
    };

    init_tracing(&TracingOptions {
        filter: filter.to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = tessera_infra::config::load_config(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            cli::serve::serve(config, args.skip_health_check).await
        }
        Commands::Nodes => cli::nodes::print_nodes(),
        Commands::Translate { file } => cli::translate::translate_file(&file).await,
    }
}
