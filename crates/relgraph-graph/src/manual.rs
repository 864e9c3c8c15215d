//! Operator-declared edges.

use relgraph_core::{node_id, GraphEdge, ManualEdgeRequest, NodeRef, NodeType, Token, ValidationError};
use relgraph_store::{cypher, GraphStore};
use tracing::info;

use crate::error::GraphResult;

fn endpoint(node: &NodeRef, what: &'static str) -> Result<(NodeType, String), ValidationError> {
    let node_type = NodeType::parse(&node.node_type)?;
    let key = node.key.trim();
    if key.is_empty() {
        return Err(ValidationError::Missing(what));
    }
    Ok((node_type, key.to_string()))
}

/// Create or refresh a manual edge. Repeating the call only bumps `updated_at`.
pub async fn create_manual_edge(
    store: &dyn GraphStore,
    req: &ManualEdgeRequest,
    now_ms: i64,
) -> GraphResult<GraphEdge> {
    let edge_type = Token::edge_type(&req.edge_type)?;
    let (from_type, from_key) = endpoint(&req.from, "from.key")?;
    let (to_type, to_key) = endpoint(&req.to, "to.key")?;

    let query = cypher::upsert_manual(from_type, &from_key, to_type, &to_key, &edge_type, now_ms);
    store.execute(&query).await?;

    let edge = GraphEdge::new(
        node_id(from_type, &from_key),
        node_id(to_type, &to_key),
        edge_type.as_str(),
        true,
    );
    info!(id = %edge.id, from = %edge.from, to = %edge.to, edge_type = %edge_type, "Manual edge saved");
    Ok(edge)
}
