//! Workflow endpoints: submit, status, status stream, output.
//!
//! - `POST /v1/workflows` -- ExecuteWorkflow
//! - `GET /v1/workflows/latest` -- status of the most recent submission
//! - `GET /v1/workflows/{id}` -- GetWorkflowStatus
//! - `GET /v1/workflows/{id}/events` -- StreamStatus as SSE (`status` events)
//! - `GET /v1/workflows/{id}/output` -- artifact location of a completed job
//!
//! Unknown ids are not errors for status reads; they report `unknown`.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use tessera_types::graph::WorkflowGraph;
use tessera_types::status::{ExecuteWorkflowResponse, OutputLocation, WorkflowStatus};
use tokio::sync::mpsc;
use tokio_stream::Stream;

use crate::http::error::AppError;
use crate::state::AppState;

/// Buffered snapshots between the polling loop and the SSE writer.
const STREAM_BUFFER: usize = 16;

/// POST /v1/workflows
///
/// An empty body submits no graph; the job still runs with default
/// parameters.
pub async fn execute_workflow(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ExecuteWorkflowResponse>), AppError> {
    let graph = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let graph = serde_json::from_slice::<WorkflowGraph>(&body)
            .map_err(|e| AppError::Validation(format!("invalid workflow request: {e}")))?;
        Some(graph)
    };

    let response = state.orchestrator.execute_workflow(graph);
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /v1/workflows/latest
pub async fn latest_status(State(state): State<AppState>) -> Json<WorkflowStatus> {
    Json(state.orchestrator.latest_status())
}

/// GET /v1/workflows/{id}
pub async fn get_workflow_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<WorkflowStatus> {
    Json(state.orchestrator.get_workflow_status(&id))
}

/// GET /v1/workflows/{id}/output
pub async fn get_output(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OutputLocation>, AppError> {
    state
        .orchestrator
        .resolve_output(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no output for workflow '{id}'")))
}

/// GET /v1/workflows/{id}/events
///
/// Each `status` event carries one JSON `StatusEvent`. The stream closes
/// after the terminal snapshot, or immediately for an unknown id. A client
/// disconnect drops the receiver and ends the polling loop; the job keeps
/// running.
pub async fn stream_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, mut rx) = mpsc::channel(STREAM_BUFFER);
    let orchestrator = state.orchestrator.clone();
    let cancel = state.shutdown.child_token();

    tokio::spawn(async move {
        tracing::debug!(job_id = %id, "status stream started");
        match orchestrator.stream_status(&id, tx, &cancel).await {
            Ok(()) => tracing::debug!(job_id = %id, "status stream finished"),
            Err(err) => tracing::debug!(job_id = %id, error = %err, "status stream ended early"),
        }
    });

    let sse_stream = async_stream::stream! {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(data) => yield Ok::<_, Infallible>(Event::default().event("status").data(data)),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to serialize status event");
                    break;
                }
            }
        }
    };

    Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
