//! Per-node lifecycle tracking for a job.
//!
//! Node states are a display projection of the submitted graph. They carry no
//! scheduling meaning; the driver moves them in bulk as the single stage
//! progresses.

use std::collections::BTreeMap;

use tessera_types::job::{JobState, NodeId, NodeState};

use crate::workflow::translator::GraphNode;

/// Node state map as stored on a job. `None` until tracking starts.
pub type NodeStates = Option<BTreeMap<NodeId, NodeState>>;

/// Stateless helper over a job's node state map.
pub struct NodeStateTracker;

impl NodeStateTracker {
    /// Every node of the graph starts `queued`. A graph with no nodes yields
    /// `None` so the job keeps no node detail at all.
    pub fn initial_states(nodes: &[GraphNode]) -> NodeStates {
        if nodes.is_empty() {
            return None;
        }
        let states = nodes
            .iter()
            .map(|node| {
                (
                    node.id,
                    NodeState {
                        node_id: node.id,
                        node_type: node.node_type.clone(),
                        state: JobState::Queued,
                    },
                )
            })
            .collect();
        Some(states)
    }

    /// Set `state` on each id, creating entries with an empty type for ids
    /// not seen before. An empty id list leaves the map untouched.
    pub fn apply(states: &mut NodeStates, ids: &[NodeId], state: JobState) {
        if ids.is_empty() {
            return;
        }
        let map = states.get_or_insert_with(BTreeMap::new);
        for &id in ids {
            map.entry(id)
                .and_modify(|node| node.state = state)
                .or_insert_with(|| NodeState {
                    node_id: id,
                    node_type: String::new(),
                    state,
                });
        }
    }

    /// Node states in ascending id order.
    pub fn snapshot(states: Option<&BTreeMap<NodeId, NodeState>>) -> Vec<NodeState> {
        states
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }
}
