//! Status DTOs returned by the orchestrator service.

use serde::{Deserialize, Serialize};

use crate::job::{Job, JobState, NodeState};

/// Message reported for an id the registry has never seen.
pub const NOT_FOUND_MESSAGE: &str = "not found";

/// Message reported by `latest_status` before any submission.
pub const NO_JOB_MESSAGE: &str = "no job submitted";

/// State as reported to clients: a job state, or `unknown` for absent ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportedState {
    Queued,
    Running,
    Completed,
    Failed,
    Unknown,
}

impl From<JobState> for ReportedState {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Queued => ReportedState::Queued,
            JobState::Running => ReportedState::Running,
            JobState::Completed => ReportedState::Completed,
            JobState::Failed => ReportedState::Failed,
        }
    }
}

/// Response to `ExecuteWorkflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteWorkflowResponse {
    pub workflow_id: String,
}

/// Response to `GetWorkflowStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatus {
    pub workflow_id: String,
    pub state: ReportedState,
    pub message: String,
}

impl WorkflowStatus {
    /// Sentinel for an id with no job behind it. Absence is not an error.
    pub fn unknown(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            state: ReportedState::Unknown,
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    pub fn from_job(job: &Job) -> Self {
        Self {
            workflow_id: job.id.clone(),
            state: job.state.into(),
            message: job.message.clone(),
        }
    }
}

/// One snapshot pushed by `StreamStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub workflow_id: String,
    pub state: JobState,
    pub message: String,
    pub progress: f64,
    /// Node projection, ascending by node id. Empty before node tracking
    /// starts or for graphs without nodes.
    #[serde(default)]
    pub nodes: Vec<NodeState>,
}

impl StatusEvent {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Location of a completed job's artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLocation {
    pub workflow_id: String,
    pub output_uri: String,
}
