//! Stable identifiers for nodes and edges.
//!
//! Both ids are pure functions of their inputs so that clients can cache or
//! diff subgraph responses across calls.

use sha2::{Digest, Sha256};

use crate::model::node::NodeType;

/// Number of digest bytes kept in an edge id (16 hex characters).
const EDGE_ID_BYTES: usize = 8;

/// External id of a node: `"<TYPE>:<key>"`.
pub fn node_id(node_type: NodeType, key: &str) -> String {
    format!("{}:{}", node_type.as_str(), key)
}

/// External id of an aggregated edge.
///
/// Every event between the same ordered pair with the same type maps onto
/// the same id.
pub fn edge_id(from_id: &str, to_id: &str, edge_type: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(from_id.as_bytes());
    hasher.update(b"|");
    hasher.update(to_id.as_bytes());
    hasher.update(b"|");
    hasher.update(edge_type.as_bytes());
    let digest = hasher.finalize();

    let mut id = String::with_capacity(2 + EDGE_ID_BYTES * 2);
    id.push_str("e_");
    for byte in &digest[..EDGE_ID_BYTES] {
        id.push_str(&format!("{:02x}", byte));
    }
    id
}
