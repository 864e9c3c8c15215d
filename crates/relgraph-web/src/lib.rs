//! relgraph Web Server
//!
//! Axum-based JSON API over the graph service.

pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use relgraph_graph::GraphService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Graph
        .route("/graph/subgraph", post(routes::graph::subgraph))
        .route("/graph/edges", post(routes::graph::create_edge))
        .route("/graph/metadata", get(routes::graph::metadata))
        // Ingestion
        .route("/ingest/events", post(routes::ingest::ingest_events))
        .route("/ingest/event", post(routes::ingest::ingest_event))
        .with_state(state.clone());

    Router::new()
        .nest("/v1", api_routes)
        .route("/healthz", get(routes::health::healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(graph: GraphService, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(graph);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
