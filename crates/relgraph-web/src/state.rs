//! Application state.

use std::sync::Arc;

use relgraph_graph::GraphService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<GraphService>,
}

impl AppState {
    pub fn new(graph: GraphService) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}
