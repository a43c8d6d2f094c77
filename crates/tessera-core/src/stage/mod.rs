//! StageRunner trait definition.
//!
//! The stage runner is the external service that performs the actual
//! generation. The orchestrator only ever sees it through this trait, so the
//! transport (HTTP in production, a scripted fake in tests) is swappable.

pub mod health;

use tessera_types::error::StageError;
use tessera_types::stage::{HealthResponse, StageRequest, StageResult};

/// Trait for stage runner backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Implementations
/// live in tessera-infra (e.g., `HttpStageRunner`) and must classify transport
/// failures onto `StageError` so the dispatcher can decide retries.
pub trait StageRunner: Send + Sync {
    /// Execute one stage request and return its result.
    fn run_stage(
        &self,
        request: &StageRequest,
    ) -> impl std::future::Future<Output = Result<StageResult, StageError>> + Send;

    /// Probe the runner's health.
    fn health(&self) -> impl std::future::Future<Output = Result<HealthResponse, StageError>> + Send;
}
