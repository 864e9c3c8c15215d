//! FalkorDB schema initialization (key-property indexes).

use relgraph_core::NodeType;
use tracing::{info, warn};

use crate::cypher;
use crate::store::GraphStore;

/// Create an exact-match index on every node type's key property.
///
/// Safe to run repeatedly: a failure (typically "index already exists") is
/// logged and skipped. Returns how many index statements succeeded.
pub async fn ensure_schema(store: &dyn GraphStore) -> usize {
    info!("Initializing graph schema...");

    let mut created = 0;
    for node_type in NodeType::ALL {
        match store.execute(&cypher::create_index(node_type)).await {
            Ok(_) => created += 1,
            Err(e) => warn!(label = node_type.label(), error = %e, "index statement skipped"),
        }
    }

    info!(created, total = NodeType::ALL.len(), "Graph schema initialized");
    created
}
