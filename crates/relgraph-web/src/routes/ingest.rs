//! Ingestion route handlers.

use axum::{extract::State, http::StatusCode, Json};
use relgraph_core::{CustomerEvent, IngestResponse};
use relgraph_graph::BatchOutcome;

use super::status_for;
use crate::state::AppState;

fn respond(outcome: BatchOutcome) -> (StatusCode, Json<IngestResponse>) {
    let status = match &outcome.error {
        None => StatusCode::OK,
        Some(e) => status_for(e),
    };
    (status, Json(outcome.response))
}

pub async fn ingest_events(
    State(state): State<AppState>,
    Json(events): Json<Vec<CustomerEvent>>,
) -> (StatusCode, Json<IngestResponse>) {
    respond(state.graph.ingest_batch(&events).await)
}

pub async fn ingest_event(
    State(state): State<AppState>,
    Json(event): Json<CustomerEvent>,
) -> (StatusCode, Json<IngestResponse>) {
    respond(state.graph.ingest_batch(std::slice::from_ref(&event)).await)
}
