//! In-memory job registry.
//!
//! The registry is the only shared mutable state in the orchestrator. Every
//! operation takes the single mutex for the duration of one map operation and
//! never across I/O. Updates addressed to an absent id are dropped silently.

use std::collections::HashMap;
use std::sync::Mutex;

use tessera_types::job::{Job, JobState, NodeId};
use tessera_types::status::{StatusEvent, WorkflowStatus};

use super::node_state::{NodeStateTracker, NodeStates};

/// Thread-safe map of job id to job record.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<HashMap<String, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a job record.
    pub fn insert(&self, job: Job) {
        let mut jobs = self.jobs.lock().expect("job registry lock poisoned");
        jobs.insert(job.id.clone(), job);
    }

    /// A copy of the job record, if present.
    pub fn get(&self, id: &str) -> Option<Job> {
        let jobs = self.jobs.lock().expect("job registry lock poisoned");
        jobs.get(id).cloned()
    }

    /// Status view of a job, or the `unknown` sentinel.
    pub fn status(&self, id: &str) -> WorkflowStatus {
        let jobs = self.jobs.lock().expect("job registry lock poisoned");
        jobs.get(id)
            .map(WorkflowStatus::from_job)
            .unwrap_or_else(|| WorkflowStatus::unknown(id))
    }

    /// A consistent stream snapshot of the job, taken under one lock.
    pub fn snapshot(&self, id: &str) -> Option<StatusEvent> {
        let jobs = self.jobs.lock().expect("job registry lock poisoned");
        jobs.get(id).map(|job| StatusEvent {
            workflow_id: job.id.clone(),
            state: job.state,
            message: job.message.clone(),
            progress: job.progress,
            nodes: NodeStateTracker::snapshot(job.node_states.as_ref()),
        })
    }

    /// Overwrite state, message and progress. A job already in a terminal
    /// state keeps it.
    pub fn update_status(&self, id: &str, state: JobState, message: &str, progress: f64) {
        self.with_job(id, |job| {
            if job.state.is_terminal() {
                tracing::debug!(job_id = %job.id, state = %job.state, "ignoring update to terminal job");
                return;
            }
            job.state = state;
            job.message = message.to_string();
            job.progress = progress;
        });
    }

    /// Resolve a job as completed with its output reference.
    pub fn complete(&self, id: &str, output_uri: &str) {
        self.with_job(id, |job| {
            if job.state.is_terminal() {
                return;
            }
            job.state = JobState::Completed;
            job.message = output_uri.to_string();
            job.progress = 1.0;
            job.output_uri = Some(output_uri.to_string());
        });
    }

    /// Replace the job's node state map wholesale.
    pub fn set_node_states(&self, id: &str, states: NodeStates) {
        self.with_job(id, |job| job.node_states = states);
    }

    /// Bulk-set node states. An empty id list changes nothing.
    pub fn update_node_states(&self, id: &str, ids: &[NodeId], state: JobState) {
        if ids.is_empty() {
            return;
        }
        self.with_job(id, |job| {
            NodeStateTracker::apply(&mut job.node_states, ids, state);
        });
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().expect("job registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_job(&self, id: &str, mutate: impl FnOnce(&mut Job)) {
        let mut jobs = self.jobs.lock().expect("job registry lock poisoned");
        match jobs.get_mut(id) {
            Some(job) => {
                mutate(job);
                job.touch();
            }
            None => tracing::debug!(job_id = %id, "dropping update for unknown job"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_types::status::ReportedState;

    use crate::workflow::translator::GraphNode;

    #[test]
    fn test_insert_and_get() {
        let registry = JobRegistry::new();
        assert!(registry.is_empty());
        registry.insert(Job::queued("wf-1"));
        let job = registry.get("wf-1").unwrap();
        assert_eq!(job.state, JobState::Queued);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("wf-2").is_none());
    }

    #[test]
    fn test_status_unknown_for_absent_id() {
        let registry = JobRegistry::new();
        let status = registry.status("wf-missing");
        assert_eq!(status.state, ReportedState::Unknown);
        assert_eq!(status.message, "not found");
        assert!(registry.snapshot("wf-missing").is_none());
    }

    #[test]
    fn test_updates_to_absent_id_are_dropped() {
        let registry = JobRegistry::new();
        registry.update_status("ghost", JobState::Running, "dispatched", 0.1);
        registry.update_node_states("ghost", &[1], JobState::Running);
        registry.complete("ghost", "file:///x.png");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_status_bumps_timestamp() {
        let registry = JobRegistry::new();
        registry.insert(Job::queued("wf-1"));
        let before = registry.get("wf-1").unwrap().updated_at;
        registry.update_status("wf-1", JobState::Running, "dispatched", 0.1);
        let job = registry.get("wf-1").unwrap();
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.message, "dispatched");
        assert!(job.updated_at >= before);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let registry = JobRegistry::new();
        registry.insert(Job::queued("wf-1"));
        registry.complete("wf-1", "file:///artifacts/wf-1/image.png");
        registry.update_status("wf-1", JobState::Failed, "late failure", 1.0);

        let job = registry.get("wf-1").unwrap();
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.message, "file:///artifacts/wf-1/image.png");
        assert_eq!(
            job.output_uri.as_deref(),
            Some("file:///artifacts/wf-1/image.png")
        );
        assert_eq!(job.progress, 1.0);
    }

    #[test]
    fn test_snapshot_includes_sorted_nodes() {
        let registry = JobRegistry::new();
        registry.insert(Job::queued("wf-1"));
        assert!(registry.snapshot("wf-1").unwrap().nodes.is_empty());

        let states = NodeStateTracker::initial_states(&[
            GraphNode { id: 7, node_type: "KSampler".into() },
            GraphNode { id: 2, node_type: "CLIPTextEncode".into() },
        ]);
        registry.set_node_states("wf-1", states);
        registry.update_node_states("wf-1", &[7], JobState::Running);

        let event = registry.snapshot("wf-1").unwrap();
        let nodes: Vec<(NodeId, JobState)> =
            event.nodes.iter().map(|n| (n.node_id, n.state)).collect();
        assert_eq!(nodes, vec![(2, JobState::Queued), (7, JobState::Running)]);
    }

    #[test]
    fn test_update_node_states_empty_ids_noop() {
        let registry = JobRegistry::new();
        registry.insert(Job::queued("wf-1"));
        registry.update_node_states("wf-1", &[], JobState::Completed);
        assert!(registry.get("wf-1").unwrap().node_states.is_none());
    }
}
