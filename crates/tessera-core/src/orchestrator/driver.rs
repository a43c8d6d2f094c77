//! Per-job background driver.
//!
//! The driver owns one job from `queued` to a terminal state. It returns
//! nothing; its whole contract is the registry state it leaves behind. Node
//! states are always written before the terminal job status.

use std::sync::Arc;

use tessera_types::graph::WorkflowGraph;
use tessera_types::job::{JobState, NodeId};
use tokio_util::sync::CancellationToken;

use super::dispatcher::StageDispatcher;
use super::node_state::NodeStateTracker;
use super::registry::JobRegistry;
use crate::stage::StageRunner;
use crate::workflow::translator::{self, NodePhase};

/// Progress reported while the stage is in flight.
pub const DISPATCH_PROGRESS: f64 = 0.1;

pub struct JobDriver<R: StageRunner> {
    registry: Arc<JobRegistry>,
    dispatcher: Arc<StageDispatcher<R>>,
    cancel: CancellationToken,
}

impl<R: StageRunner> JobDriver<R> {
    pub fn new(
        registry: Arc<JobRegistry>,
        dispatcher: Arc<StageDispatcher<R>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            cancel,
        }
    }

    /// Drive `job_id` to completion.
    pub async fn run(self, job_id: String, graph: Option<WorkflowGraph>) {
        let workflow = translator::translate(graph.as_ref());
        let registry = &self.registry;

        registry.update_status(&job_id, JobState::Running, "dispatched", DISPATCH_PROGRESS);
        registry.set_node_states(&job_id, NodeStateTracker::initial_states(&workflow.nodes));

        let input_nodes = workflow.node_ids_in_phase(NodePhase::Input);
        let sampler_nodes = workflow.node_ids_in_phase(NodePhase::Sampling);
        let output_nodes = workflow.node_ids_in_phase(NodePhase::Output);

        registry.update_node_states(&job_id, &input_nodes, JobState::Completed);
        registry.update_node_states(&job_id, &sampler_nodes, JobState::Running);

        let request = translator::build_stage_request(&job_id, &workflow.spec);
        tracing::info!(
            job_id = %job_id,
            checkpoint = %workflow.spec.checkpoint,
            nodes = workflow.nodes.len(),
            "dispatching stage"
        );

        let outcome = self
            .dispatcher
            .run_with_retries(&self.cancel, &request, |attempt, max_attempts| {
                registry.update_status(
                    &job_id,
                    JobState::Running,
                    &format!("stage unavailable, retrying ({attempt}/{max_attempts})"),
                    DISPATCH_PROGRESS,
                );
            })
            .await;

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(job_id = %job_id, error = %err, "stage run failed");
                self.fail(&job_id, &sampler_nodes, &self.dispatcher.failure_message(&err));
                return;
            }
        };

        if !result.is_completed() {
            let message = result
                .error_message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or("stage failed");
            tracing::error!(job_id = %job_id, status = %result.status, error = %message, "stage reported failure");
            self.fail(&job_id, &sampler_nodes, message);
            return;
        }

        let Some(output_uri) = result.image_uri() else {
            tracing::error!(job_id = %job_id, "stage response missing image output");
            self.fail(&job_id, &sampler_nodes, "stage returned no output");
            return;
        };

        registry.update_node_states(&job_id, &sampler_nodes, JobState::Completed);
        registry.update_node_states(&job_id, &output_nodes, JobState::Completed);
        registry.complete(&job_id, output_uri);
        tracing::info!(job_id = %job_id, output_uri = %output_uri, "job completed");
    }

    fn fail(&self, job_id: &str, sampler_nodes: &[NodeId], message: &str) {
        self.registry
            .update_node_states(job_id, sampler_nodes, JobState::Failed);
        self.registry
            .update_status(job_id, JobState::Failed, message, 1.0);
    }
}
