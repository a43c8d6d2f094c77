//! Application state wiring the orchestrator to its concrete stage runner.

use std::sync::Arc;
use std::time::Duration;

use tessera_core::orchestrator::dispatcher::RetryPolicy;
use tessera_core::orchestrator::service::OrchestratorService;
use tessera_infra::stage::HttpStageRunner;
use tessera_types::config::OrchestratorConfig;
use tokio_util::sync::CancellationToken;

/// The orchestrator service pinned to the HTTP stage runner.
pub type ConcreteOrchestrator = OrchestratorService<HttpStageRunner>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub runner: Arc<HttpStageRunner>,
    pub config: Arc<OrchestratorConfig>,
    /// Cancelled on process shutdown; parent of every open status stream.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: OrchestratorConfig) -> anyhow::Result<Self> {
        let runner = Arc::new(HttpStageRunner::new(config.stage_addr.clone())?);
        let orchestrator = OrchestratorService::new(runner.clone(), RetryPolicy::from_config(&config))
            .with_stream_interval(Duration::from_millis(config.stream_interval_ms));

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            runner,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        })
    }

    /// Stop open status streams and cancel in-flight stage dispatches.
    pub fn begin_shutdown(&self) {
        self.shutdown.cancel();
        self.orchestrator.shutdown();
    }
}
