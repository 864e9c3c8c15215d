//! Aggregated relationship edges.

use serde::{Deserialize, Serialize};

use crate::ids::edge_id;

/// Rolling statistics carried by an aggregated edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeStats {
    pub event_count: i64,
    pub event_count_30d: i64,
    pub distinct_ip_count_30d: i64,
    pub first_seen: i64,
    pub last_seen: i64,
    pub total_amount: f64,
    pub max_amount: f64,
}

/// A directed edge in a subgraph response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub from: String,
    pub to: String,
    pub directed: bool,
    pub manual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EdgeStats>,
}

impl GraphEdge {
    /// Build an edge between two node ids; the edge id is derived from them.
    pub fn new(from: String, to: String, edge_type: &str, manual: bool) -> Self {
        Self {
            id: edge_id(&from, &to, edge_type),
            edge_type: edge_type.to_string(),
            from,
            to,
            directed: true,
            manual,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: EdgeStats) -> Self {
        self.stats = Some(stats);
        self
    }
}
