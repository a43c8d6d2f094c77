//! Submitted workflow graphs and the canonical spec derived from them.

use serde::{Deserialize, Serialize};

/// A raw graph payload as submitted by a client.
///
/// `workflow_json` is the serialized node graph. It is advisory: a payload
/// that fails to parse still produces a job with default parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub workflow_json: String,
}

impl WorkflowGraph {
    pub fn from_json(workflow_json: impl Into<String>) -> Self {
        Self {
            format: "json".to_string(),
            workflow_json: workflow_json.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowSpec
// ---------------------------------------------------------------------------

pub const DEFAULT_WIDTH: i64 = 512;
pub const DEFAULT_HEIGHT: i64 = 512;
pub const DEFAULT_STEPS: i64 = 20;
pub const DEFAULT_CFG: f64 = 8.0;
pub const DEFAULT_SAMPLER: &str = "euler";
pub const DEFAULT_SCHEDULER: &str = "normal";

/// Canonical stage parameters condensed from a graph.
///
/// Always fully populated: fields the graph does not supply keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSpec {
    pub checkpoint: String,
    pub positive: String,
    pub negative: String,
    pub width: i64,
    pub height: i64,
    pub seed: i64,
    pub steps: i64,
    pub cfg: f64,
    pub sampler: String,
    pub scheduler: String,
}

impl Default for WorkflowSpec {
    fn default() -> Self {
        Self {
            checkpoint: String::new(),
            positive: String::new(),
            negative: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            seed: 0,
            steps: DEFAULT_STEPS,
            cfg: DEFAULT_CFG,
            sampler: DEFAULT_SAMPLER.to_string(),
            scheduler: DEFAULT_SCHEDULER.to_string(),
        }
    }
}
