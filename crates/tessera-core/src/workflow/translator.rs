//! Workflow translator: raw graph payload to canonical stage parameters.
//!
//! Translation is a pure function and never fails. A missing or malformed
//! payload yields the all-defaults `WorkflowSpec` and an empty node index,
//! because the graph is advisory and the job is attempted regardless.
//!
//! Recognized node types contribute positional widget values:
//! - checkpoint loaders -> `checkpoint` (slot 0)
//! - text encoders -> prompt list; first is `positive`, second `negative`
//! - latent size -> `width`, `height` (slots 0, 1)
//! - sampler -> `seed`, `steps`, `cfg`, `sampler`, `scheduler` (slots 0..5)

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tessera_types::graph::{WorkflowGraph, WorkflowSpec};
use tessera_types::job::NodeId;
use tessera_types::stage::{StageRequest, TEXT_TO_IMAGE_STAGE};

use super::widgets::WidgetValues;

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Classification of a graph node by its type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CheckpointLoader,
    TextEncode,
    LatentSize,
    Sampler,
    Decode,
    Save,
    Other,
}

impl NodeKind {
    pub fn of(node_type: &str) -> Self {
        match node_type {
            "CheckpointLoaderSimple" | "LoadCheckpoint" => NodeKind::CheckpointLoader,
            "CLIPTextEncode" | "CLIPTextEncodePrompt" => NodeKind::TextEncode,
            "EmptyLatentImage" => NodeKind::LatentSize,
            "KSampler" => NodeKind::Sampler,
            "VAEDecode" => NodeKind::Decode,
            "SaveImage" => NodeKind::Save,
            _ => NodeKind::Other,
        }
    }

    /// Which phase of the condensed single-stage pipeline this node belongs to.
    pub fn phase(self) -> NodePhase {
        match self {
            NodeKind::CheckpointLoader | NodeKind::TextEncode | NodeKind::LatentSize => {
                NodePhase::Input
            }
            NodeKind::Sampler => NodePhase::Sampling,
            NodeKind::Decode | NodeKind::Save => NodePhase::Output,
            NodeKind::Other => NodePhase::Untracked,
        }
    }
}

/// Phase a node's state follows while the job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    /// Inputs to the stage; complete as soon as dispatch begins.
    Input,
    /// Computed by the stage; mirrors the stage outcome.
    Sampling,
    /// Downstream of the stage; complete only on success.
    Output,
    /// Unrecognized; stays `queued`.
    Untracked,
}

// ---------------------------------------------------------------------------
// Translation output
// ---------------------------------------------------------------------------

/// One entry of the node index: every node of the graph, recognized or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: NodeId,
    pub node_type: String,
}

impl GraphNode {
    pub fn kind(&self) -> NodeKind {
        NodeKind::of(&self.node_type)
    }
}

/// Result of translating a graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslatedWorkflow {
    pub spec: WorkflowSpec,
    pub nodes: Vec<GraphNode>,
}

impl TranslatedWorkflow {
    /// Ids of the nodes whose kind falls in `phase`, in graph order.
    pub fn node_ids_in_phase(&self, phase: NodePhase) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.kind().phase() == phase)
            .map(|node| node.id)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Raw graph
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawGraph {
    #[serde(default)]
    nodes: Option<Vec<RawNode>>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: NodeId,
    #[serde(default, rename = "type")]
    node_type: String,
    #[serde(default)]
    widgets_values: Value,
}

// ---------------------------------------------------------------------------
// translate
// ---------------------------------------------------------------------------

/// Translate a submitted graph into a `WorkflowSpec` and node index.
pub fn translate(graph: Option<&WorkflowGraph>) -> TranslatedWorkflow {
    let Some(graph) = graph else {
        return TranslatedWorkflow::default();
    };

    let raw: RawGraph = match serde_json::from_str(&graph.workflow_json) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(error = %err, "workflow graph did not parse, using defaults");
            return TranslatedWorkflow::default();
        }
    };

    let raw_nodes = raw.nodes.unwrap_or_default();
    let mut spec = WorkflowSpec::default();
    let mut prompts: Vec<String> = Vec::new();

    for node in &raw_nodes {
        let widgets = WidgetValues::from_value(&node.widgets_values);
        match NodeKind::of(&node.node_type) {
            NodeKind::CheckpointLoader => {
                spec.checkpoint = widgets.string_or(0, &spec.checkpoint);
            }
            NodeKind::TextEncode => {
                if let Some(text) = widgets.str_at(0).filter(|t| !t.is_empty()) {
                    prompts.push(text.to_string());
                }
            }
            NodeKind::LatentSize => {
                spec.width = widgets.int_or(0, spec.width);
                spec.height = widgets.int_or(1, spec.height);
            }
            NodeKind::Sampler => {
                spec.seed = widgets.int_or(0, spec.seed);
                spec.steps = widgets.int_or(1, spec.steps);
                spec.cfg = widgets.float_or(2, spec.cfg);
                spec.sampler = widgets.string_or(3, &spec.sampler);
                spec.scheduler = widgets.string_or(4, &spec.scheduler);
            }
            NodeKind::Decode | NodeKind::Save | NodeKind::Other => {}
        }
    }

    let mut prompts = prompts.into_iter();
    if let Some(positive) = prompts.next() {
        spec.positive = positive;
    }
    if let Some(negative) = prompts.next() {
        spec.negative = negative;
    }

    let nodes = raw_nodes
        .into_iter()
        .map(|node| GraphNode {
            id: node.id,
            node_type: node.node_type,
        })
        .collect();

    TranslatedWorkflow { spec, nodes }
}

// ---------------------------------------------------------------------------
// Stage request building
// ---------------------------------------------------------------------------

/// Render a spec as the runner's string-keyed parameter bag.
pub fn stage_params(spec: &WorkflowSpec) -> HashMap<String, String> {
    HashMap::from([
        ("checkpoint".to_string(), spec.checkpoint.clone()),
        ("positive".to_string(), spec.positive.clone()),
        ("negative".to_string(), spec.negative.clone()),
        ("width".to_string(), spec.width.to_string()),
        ("height".to_string(), spec.height.to_string()),
        ("seed".to_string(), spec.seed.to_string()),
        ("steps".to_string(), spec.steps.to_string()),
        ("cfg".to_string(), format!("{:.2}", spec.cfg)),
        ("sampler".to_string(), spec.sampler.clone()),
        ("scheduler".to_string(), spec.scheduler.clone()),
    ])
}

/// Build the single stage request a job condenses to.
pub fn build_stage_request(job_id: &str, spec: &WorkflowSpec) -> StageRequest {
    StageRequest {
        stage_id: job_id.to_string(),
        node_type: TEXT_TO_IMAGE_STAGE.to_string(),
        params: stage_params(spec),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(value: Value) -> WorkflowGraph {
        WorkflowGraph::from_json(value.to_string())
    }

    fn full_graph() -> WorkflowGraph {
        graph(json!({
            "nodes": [
                {"id": 4, "type": "CheckpointLoaderSimple", "widgets_values": ["model.safetensors"]},
                {"id": 6, "type": "CLIPTextEncode", "widgets_values": ["cat"]},
                {"id": 7, "type": "CLIPTextEncode", "widgets_values": ["dog"]},
                {"id": 5, "type": "EmptyLatentImage", "widgets_values": [640, 384, 1]},
                {"id": 3, "type": "KSampler", "widgets_values": [1234, 30, 6.5, "euler_a", "karras", 1.0]},
                {"id": 8, "type": "VAEDecode", "widgets_values": []},
                {"id": 9, "type": "SaveImage", "widgets_values": ["ComfyUI"]},
                {"id": 10, "type": "Note", "widgets_values": ["hello"]}
            ]
        }))
    }

    #[test]
    fn test_translate_full_graph() {
        let translated = translate(Some(&full_graph()));
        assert_eq!(
            translated.spec,
            WorkflowSpec {
                checkpoint: "model.safetensors".to_string(),
                positive: "cat".to_string(),
                negative: "dog".to_string(),
                width: 640,
                height: 384,
                seed: 1234,
                steps: 30,
                cfg: 6.5,
                sampler: "euler_a".to_string(),
                scheduler: "karras".to_string(),
            }
        );
    }

    #[test]
    fn test_translate_none_yields_defaults() {
        let translated = translate(None);
        assert_eq!(translated.spec, WorkflowSpec::default());
        assert!(translated.nodes.is_empty());
    }

    #[test]
    fn test_translate_malformed_json_yields_defaults() {
        let translated = translate(Some(&WorkflowGraph::from_json("{not json")));
        assert_eq!(translated.spec, WorkflowSpec::default());
        assert!(translated.nodes.is_empty());
    }

    #[test]
    fn test_translate_empty_payload_yields_defaults() {
        let translated = translate(Some(&WorkflowGraph::default()));
        assert_eq!(translated.spec, WorkflowSpec::default());

        let translated = translate(Some(&graph(json!({"nodes": null}))));
        assert_eq!(translated.spec, WorkflowSpec::default());
        assert!(translated.nodes.is_empty());
    }

    #[test]
    fn test_node_index_keeps_unrecognized_nodes() {
        let translated = translate(Some(&full_graph()));
        assert_eq!(translated.nodes.len(), 8);
        assert!(translated
            .nodes
            .iter()
            .any(|n| n.id == 10 && n.node_type == "Note" && n.kind() == NodeKind::Other));
    }

    #[test]
    fn test_wrong_kinds_keep_defaults() {
        let translated = translate(Some(&graph(json!({
            "nodes": [
                {"id": 1, "type": "EmptyLatentImage", "widgets_values": ["wide", null]},
                {"id": 2, "type": "KSampler", "widgets_values": ["seed", 25, "high", 3, false]}
            ]
        }))));
        let spec = translated.spec;
        assert_eq!(spec.width, 512);
        assert_eq!(spec.height, 512);
        assert_eq!(spec.seed, 0);
        assert_eq!(spec.steps, 25);
        assert!((spec.cfg - 8.0).abs() < f64::EPSILON);
        assert_eq!(spec.sampler, "euler");
        assert_eq!(spec.scheduler, "normal");
    }

    #[test]
    fn test_extra_and_empty_prompts() {
        let translated = translate(Some(&graph(json!({
            "nodes": [
                {"id": 1, "type": "CLIPTextEncode", "widgets_values": [""]},
                {"id": 2, "type": "CLIPTextEncodePrompt", "widgets_values": ["first"]},
                {"id": 3, "type": "CLIPTextEncode", "widgets_values": ["second"]},
                {"id": 4, "type": "CLIPTextEncode", "widgets_values": ["third"]}
            ]
        }))));
        assert_eq!(translated.spec.positive, "first");
        assert_eq!(translated.spec.negative, "second");
    }

    #[test]
    fn test_object_shaped_widgets_are_ignored() {
        let translated = translate(Some(&graph(json!({
            "nodes": [
                {"id": 1, "type": "KSampler", "widgets_values": {"seed": 99}},
                {"id": 2, "type": "LoadCheckpoint", "widgets_values": ["sdxl.safetensors"]}
            ]
        }))));
        assert_eq!(translated.spec.seed, 0);
        assert_eq!(translated.spec.checkpoint, "sdxl.safetensors");
        assert_eq!(translated.nodes.len(), 2);
    }

    #[test]
    fn test_node_ids_by_phase() {
        let translated = translate(Some(&full_graph()));
        assert_eq!(translated.node_ids_in_phase(NodePhase::Input), vec![4, 6, 7, 5]);
        assert_eq!(translated.node_ids_in_phase(NodePhase::Sampling), vec![3]);
        assert_eq!(translated.node_ids_in_phase(NodePhase::Output), vec![8, 9]);
        assert_eq!(translated.node_ids_in_phase(NodePhase::Untracked), vec![10]);
    }

    #[test]
    fn test_stage_params_rendering() {
        let translated = translate(Some(&full_graph()));
        let request = build_stage_request("wf-1", &translated.spec);
        assert_eq!(request.stage_id, "wf-1");
        assert_eq!(request.node_type, "text_to_image");
        assert_eq!(request.params["cfg"], "6.50");
        assert_eq!(request.params["seed"], "1234");
        assert_eq!(request.params["width"], "640");
        assert_eq!(request.params["checkpoint"], "model.safetensors");
        assert_eq!(request.params.len(), 10);
    }

    #[test]
    fn test_default_params_rendering() {
        let params = stage_params(&WorkflowSpec::default());
        assert_eq!(params["cfg"], "8.00");
        assert_eq!(params["steps"], "20");
        assert_eq!(params["sampler"], "euler");
        assert_eq!(params["positive"], "");
    }
}
