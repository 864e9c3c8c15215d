//! Parsing of expansion query rows.

use relgraph_core::{EdgeStats, GraphEdge, GraphNode, NodeType};
use relgraph_store::cypher::columns;
use relgraph_store::Row;

/// One usable `user -[edge]-> entity` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionRow {
    pub from_type: NodeType,
    pub from_key: String,
    pub to_type: NodeType,
    pub to_key: String,
    pub edge_type: String,
    pub manual: bool,
    pub stats: EdgeStats,
}

impl ExpansionRow {
    /// `None` for rows with an unmapped type marker or an empty key or type.
    pub fn parse(row: &Row) -> Option<Self> {
        let from_type = NodeType::from_wire(row.str(columns::FROM_TYPE))?;
        let to_type = NodeType::from_wire(row.str(columns::TO_TYPE))?;
        let from_key = row.str(columns::FROM_KEY).trim();
        let to_key = row.str(columns::TO_KEY).trim();
        let edge_type = row.str(columns::EDGE_TYPE).trim();
        if from_key.is_empty() || to_key.is_empty() || edge_type.is_empty() {
            return None;
        }

        // Statistics are informational: a bad counter reads as zero.
        let stats = EdgeStats {
            event_count: row.i64(columns::EVENT_COUNT).unwrap_or_default(),
            event_count_30d: row.i64(columns::EVENT_COUNT_30D).unwrap_or_default(),
            distinct_ip_count_30d: row.i64(columns::DISTINCT_IP_COUNT_30D).unwrap_or_default(),
            first_seen: row.i64(columns::FIRST_SEEN).unwrap_or_default(),
            last_seen: row.i64(columns::LAST_SEEN).unwrap_or_default(),
            total_amount: row.f64(columns::TOTAL_AMOUNT).unwrap_or_default(),
            max_amount: row.f64(columns::MAX_AMOUNT).unwrap_or_default(),
        };

        Some(Self {
            from_type,
            from_key: from_key.to_string(),
            to_type,
            to_key: to_key.to_string(),
            edge_type: edge_type.to_string(),
            manual: row.flag(columns::EDGE_MANUAL),
            stats,
        })
    }

    pub fn from_node(&self) -> GraphNode {
        GraphNode::new(self.from_type, &self.from_key)
    }

    pub fn to_node(&self) -> GraphNode {
        GraphNode::new(self.to_type, &self.to_key)
    }

    /// Edge between the two endpoint ids. Purely manual edges carry no stats.
    pub fn edge(&self, from_id: String, to_id: String) -> GraphEdge {
        let edge = GraphEdge::new(from_id, to_id, &self.edge_type, self.manual);
        if self.manual && self.stats.event_count == 0 {
            edge
        } else {
            edge.with_stats(self.stats.clone())
        }
    }
}
