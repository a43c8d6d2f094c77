//! Orchestrator service facade.
//!
//! `OrchestratorService` is what transports call into. It owns the job
//! registry and the stage dispatcher, spawns one detached `JobDriver` per
//! submission, and serves status reads and polled status streams.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tessera_types::catalog::NodeCatalog;
use tessera_types::graph::WorkflowGraph;
use tessera_types::job::{Job, JobState};
use tessera_types::status::{
    ExecuteWorkflowResponse, NO_JOB_MESSAGE, OutputLocation, ReportedState, StatusEvent,
    WorkflowStatus,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::dispatcher::{RetryPolicy, StageDispatcher};
use super::driver::JobDriver;
use super::registry::JobRegistry;
use crate::stage::StageRunner;
use crate::workflow::catalog::node_catalog;

/// Default cadence of `stream_status` snapshots.
pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(1);

/// Why a status stream ended before a terminal snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("status stream cancelled")]
    Cancelled,

    #[error("status stream receiver disconnected")]
    Disconnected,
}

pub struct OrchestratorService<R: StageRunner + 'static> {
    registry: Arc<JobRegistry>,
    dispatcher: Arc<StageDispatcher<R>>,
    /// Job-scoped cancellation, independent of any request.
    jobs_token: CancellationToken,
    stream_interval: Duration,
    latest: Mutex<Option<String>>,
}

impl<R: StageRunner + 'static> OrchestratorService<R> {
    pub fn new(runner: Arc<R>, policy: RetryPolicy) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            dispatcher: Arc::new(StageDispatcher::new(runner, policy)),
            jobs_token: CancellationToken::new(),
            stream_interval: DEFAULT_STREAM_INTERVAL,
            latest: Mutex::new(None),
        }
    }

    /// Override the stream cadence. Zero keeps the default.
    pub fn with_stream_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.stream_interval = interval;
        }
        self
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    pub fn stream_interval(&self) -> Duration {
        self.stream_interval
    }

    /// Accept a graph and start its job in the background.
    ///
    /// The job is visible as `queued` before this returns. Must be called
    /// from within a Tokio runtime.
    pub fn execute_workflow(&self, graph: Option<WorkflowGraph>) -> ExecuteWorkflowResponse {
        let job_id = format!("wf-{}", Uuid::now_v7());
        self.registry.insert(Job::queued(job_id.clone()));
        *self.latest.lock().expect("latest job lock poisoned") = Some(job_id.clone());

        tracing::info!(job_id = %job_id, "workflow accepted");

        let driver = JobDriver::new(
            self.registry.clone(),
            self.dispatcher.clone(),
            self.jobs_token.child_token(),
        );
        tokio::spawn(driver.run(job_id.clone(), graph));

        ExecuteWorkflowResponse {
            workflow_id: job_id,
        }
    }

    /// Current status, or the `unknown` sentinel for an absent id.
    pub fn get_workflow_status(&self, workflow_id: &str) -> WorkflowStatus {
        self.registry.status(workflow_id)
    }

    /// Push one snapshot per tick into `sink` until the job is terminal.
    ///
    /// Returns `Ok` right away with no events for an unknown id, and `Ok`
    /// after sending a terminal snapshot. `cancel` or a dropped receiver end
    /// the stream early; the job itself is unaffected.
    pub async fn stream_status(
        &self,
        workflow_id: &str,
        sink: mpsc::Sender<StatusEvent>,
        cancel: &CancellationToken,
    ) -> Result<(), StreamError> {
        let mut ticker = tokio::time::interval(self.stream_interval);
        ticker.tick().await;

        loop {
            let Some(event) = self.registry.snapshot(workflow_id) else {
                return Ok(());
            };
            let terminal = event.is_terminal();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StreamError::Cancelled),
                sent = sink.send(event) => {
                    if sent.is_err() {
                        return Err(StreamError::Disconnected);
                    }
                }
            }
            if terminal {
                return Ok(());
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(StreamError::Cancelled),
                _ = sink.closed() => return Err(StreamError::Disconnected),
                _ = ticker.tick() => {}
            }
        }
    }

    /// The static node catalog.
    pub fn list_nodes(&self) -> NodeCatalog {
        node_catalog()
    }

    /// Status of the most recently submitted job.
    pub fn latest_status(&self) -> WorkflowStatus {
        let latest = self.latest.lock().expect("latest job lock poisoned").clone();
        match latest {
            Some(id) => self.registry.status(&id),
            None => WorkflowStatus {
                workflow_id: String::new(),
                state: ReportedState::Unknown,
                message: NO_JOB_MESSAGE.to_string(),
            },
        }
    }

    /// Artifact location of a completed job.
    pub fn resolve_output(&self, workflow_id: &str) -> Option<OutputLocation> {
        let job = self.registry.get(workflow_id)?;
        if job.state != JobState::Completed {
            return None;
        }
        job.output_uri.map(|output_uri| OutputLocation {
            workflow_id: job.id,
            output_uri,
        })
    }

    /// Cancel every in-flight job's dispatch.
    pub fn shutdown(&self) {
        self.jobs_token.cancel();
    }
}
