//! Axum router configuration with middleware.
//!
//! Routes live under `/v1/`; `/health` is the process liveness probe.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/workflows", post(handlers::workflow::execute_workflow))
        .route("/workflows/latest", get(handlers::workflow::latest_status))
        .route("/workflows/{id}", get(handlers::workflow::get_workflow_status))
        .route("/workflows/{id}/events", get(handlers::workflow::stream_status))
        .route("/workflows/{id}/output", get(handlers::workflow::get_output))
        .route("/nodes", get(handlers::nodes::list_nodes));

    Router::new()
        .nest("/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness of the orchestrator itself.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
