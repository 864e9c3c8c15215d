//! Graph route handlers.

use axum::{extract::State, http::StatusCode, Json};
use relgraph_core::{GraphEdge, ManualEdgeRequest, MetadataResponse, SubgraphRequest, SubgraphResponse};

use super::reject;
use crate::state::AppState;

pub async fn subgraph(
    State(state): State<AppState>,
    Json(req): Json<SubgraphRequest>,
) -> Result<Json<SubgraphResponse>, (StatusCode, String)> {
    let resp = state.graph.subgraph(&req).await.map_err(reject)?;
    Ok(Json(resp))
}

pub async fn create_edge(
    State(state): State<AppState>,
    Json(req): Json<ManualEdgeRequest>,
) -> Result<(StatusCode, Json<GraphEdge>), (StatusCode, String)> {
    let edge = state.graph.create_manual_edge(&req).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(edge)))
}

pub async fn metadata(
    State(state): State<AppState>,
) -> Result<Json<MetadataResponse>, (StatusCode, String)> {
    let meta = state.graph.metadata().await.map_err(reject)?;
    Ok(Json(meta))
}
