//! `tessera translate <file>` -- show what a graph file would dispatch.

use std::path::Path;

use anyhow::Context;
use serde_json::json;
use tessera_core::workflow::translator::{self, NodeKind};
use tessera_types::graph::WorkflowGraph;

pub async fn translate_file(path: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let graph = WorkflowGraph::from_json(content);
    let translated = translator::translate(Some(&graph));
    let request = translator::build_stage_request("wf-preview", &translated.spec);

    let unrecognized: Vec<_> = translated
        .nodes
        .iter()
        .filter(|node| node.kind() == NodeKind::Other)
        .map(|node| json!({ "id": node.id, "type": node.node_type }))
        .collect();

    let output = json!({
        "spec": translated.spec,
        "stageRequest": request,
        "nodeCount": translated.nodes.len(),
        "unrecognizedNodes": unrecognized,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
