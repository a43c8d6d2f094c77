//! Node catalog types for `ListNodes`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node type the orchestrator understands, with its typed ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    pub category: String,
    /// Port name to port type.
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

/// Response to `ListNodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCatalog {
    pub nodes: Vec<NodeDefinition>,
}
