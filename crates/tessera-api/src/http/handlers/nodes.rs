//! GET /v1/nodes

use axum::Json;
use axum::extract::State;
use tessera_types::catalog::NodeCatalog;

use crate::state::AppState;

pub async fn list_nodes(State(state): State<AppState>) -> Json<NodeCatalog> {
    Json(state.orchestrator.list_nodes())
}
