//! `tessera serve` -- wait for the stage runner, then serve HTTP.

use std::time::Duration;

use anyhow::Context;
use tessera_core::stage::health::wait_for_stage_health;
use tessera_types::config::OrchestratorConfig;

use crate::http::router::build_router;
use crate::state::AppState;

pub async fn serve(config: OrchestratorConfig, skip_health_check: bool) -> anyhow::Result<()> {
    tracing::info!(
        addr = %config.listen_addr,
        stage = %config.stage_addr,
        artifacts = %config.artifacts_root,
        "starting orchestrator"
    );

    let state = AppState::new(config)?;
    let config = state.config.clone();

    if skip_health_check {
        tracing::warn!("skipping stage runner health check");
    } else {
        wait_for_stage_health(
            state.runner.as_ref(),
            Duration::from_secs(config.stage_health_timeout_secs),
            Duration::from_millis(config.stage_health_interval_ms),
            Duration::from_secs(config.stage_health_request_timeout_secs),
        )
        .await
        .context("stage runner did not become healthy")?;
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "orchestrator listening");

    let router = build_router(state.clone());
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("orchestrator stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel streams and in-flight jobs.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
    state.begin_shutdown();
}
