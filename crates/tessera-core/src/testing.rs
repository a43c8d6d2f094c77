//! Scripted stage runner shared by the core test modules.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tessera_types::error::StageError;
use tessera_types::stage::{
    HealthResponse, IMAGE_OUTPUT, StageRequest, StageResult, TensorRef,
};

use crate::stage::StageRunner;

pub(crate) const TEST_IMAGE_URI: &str = "file:///artifacts/wf/image.png";

/// A successful stage result carrying an `image` output at `uri`.
pub(crate) fn completed_result(uri: &str) -> StageResult {
    let mut result = StageResult {
        status: "completed".to_string(),
        ..Default::default()
    };
    result.output_refs.insert(
        IMAGE_OUTPUT.to_string(),
        TensorRef {
            uri: uri.to_string(),
            shape: vec![1, 3, 512, 512],
            dtype: "uint8".to_string(),
        },
    );
    result
}

/// A result with an arbitrary status and optional error text, no outputs.
pub(crate) fn result_with_status(status: &str, error_message: Option<&str>) -> StageResult {
    StageResult {
        status: status.to_string(),
        error_message: error_message.map(str::to_string),
        ..Default::default()
    }
}

/// Stage runner that replays queued outcomes, then repeats a fallback.
pub(crate) struct ScriptedRunner {
    outcomes: Mutex<VecDeque<Result<StageResult, StageError>>>,
    fallback: Result<StageResult, StageError>,
    health: Mutex<VecDeque<Result<HealthResponse, StageError>>>,
    calls: Mutex<Vec<StageRequest>>,
    health_calls: AtomicUsize,
    delay: Duration,
    health_delay: Duration,
}

impl ScriptedRunner {
    /// Runner that always succeeds with `TEST_IMAGE_URI`.
    pub(crate) fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            fallback: Ok(completed_result(TEST_IMAGE_URI)),
            health: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            health_calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            health_delay: Duration::ZERO,
        }
    }

    /// Queue an outcome for the next unanswered `run_stage` call.
    pub(crate) fn then(self, outcome: Result<StageResult, StageError>) -> Self {
        self.outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .push_back(outcome);
        self
    }

    /// Outcome returned once the queue is drained.
    pub(crate) fn otherwise(mut self, outcome: Result<StageResult, StageError>) -> Self {
        self.fallback = outcome;
        self
    }

    /// Sleep before answering each `run_stage` call.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a health probe outcome. A drained queue reports healthy.
    pub(crate) fn then_health(self, outcome: Result<HealthResponse, StageError>) -> Self {
        self.health
            .lock()
            .expect("health lock poisoned")
            .push_back(outcome);
        self
    }

    /// Sleep before answering each health probe.
    pub(crate) fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = delay;
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock poisoned").len()
    }

    pub(crate) fn calls(&self) -> Vec<StageRequest> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub(crate) fn health_call_count(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }
}

impl StageRunner for ScriptedRunner {
    async fn run_stage(&self, request: &StageRequest) -> Result<StageResult, StageError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(request.clone());
        let outcome = self
            .outcomes
            .lock()
            .expect("outcomes lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        outcome
    }

    async fn health(&self) -> Result<HealthResponse, StageError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .health
            .lock()
            .expect("health lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HealthResponse {
                    status: "ok".to_string(),
                })
            });
        if !self.health_delay.is_zero() {
            tokio::time::sleep(self.health_delay).await;
        }
        outcome
    }
}
