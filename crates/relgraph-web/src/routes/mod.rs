//! Route handlers.

pub mod graph;
pub mod health;
pub mod ingest;

use axum::http::StatusCode;
use relgraph_graph::GraphError;

/// Status code for a failed graph operation.
pub fn status_for(err: &GraphError) -> StatusCode {
    match err {
        GraphError::Validation(_) => StatusCode::BAD_REQUEST,
        e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        GraphError::Store(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Map a graph error to the `(status, message)` rejection used by handlers.
pub fn reject(err: GraphError) -> (StatusCode, String) {
    if !err.is_validation() {
        tracing::error!(error = %err, "graph operation failed");
    }
    (status_for(&err), err.to_string())
}
