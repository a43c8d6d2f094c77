//! Job and node lifecycle types.
//!
//! A `Job` is the registry's record of one execution request. Node states are
//! a display projection of the submitted graph, keyed by the graph's node id.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// JobState
// ---------------------------------------------------------------------------

/// Lifecycle state shared by jobs and the nodes they track.
///
/// `Completed` and `Failed` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobState {
    /// Whether this state ends the lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobState::Queued),
            "running" => Ok(JobState::Running),
            "completed" => Ok(JobState::Completed),
            "failed" => Ok(JobState::Failed),
            other => Err(format!("invalid job state: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// NodeState
// ---------------------------------------------------------------------------

/// Identifier of a node inside a submitted graph.
pub type NodeId = i64;

/// Lifecycle state of a single graph node, scoped to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    pub node_id: NodeId,
    /// Graph node type name. Empty when the node was first referenced by a
    /// state update rather than by job start.
    pub node_type: String,
    pub state: JobState,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// The registry record for one execution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub state: JobState,
    /// Human-readable status or error text, overwritten on every transition.
    pub message: String,
    /// Fraction in `[0, 1]`; non-decreasing by convention.
    pub progress: f64,
    /// Reference to the produced artifact. Set only once `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_uri: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Absent until the driver initialises node tracking, and stays absent
    /// for graphs with no nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_states: Option<BTreeMap<NodeId, NodeState>>,
}

impl Job {
    /// Create a freshly submitted job in the `queued` state.
    pub fn queued(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: JobState::Queued,
            message: String::new(),
            progress: 0.0,
            output_uri: None,
            updated_at: Utc::now(),
            node_states: None,
        }
    }

    /// Bump `updated_at`. Every mutation goes through here.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
