//! Ordered, deduplicated node and edge collections.

use std::collections::HashSet;

use relgraph_core::{GraphEdge, GraphNode};

use super::budget::Budget;

/// Nodes and edges discovered so far, in discovery order.
#[derive(Debug, Default)]
pub struct Accumulator {
    nodes: Vec<GraphNode>,
    node_ids: HashSet<String>,
    edges: Vec<GraphEdge>,
    edge_ids: HashSet<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Known ids cost nothing; a new id takes a node slot.
    /// Returns whether the node is present afterwards.
    pub fn put_node(&mut self, node: GraphNode, budget: &mut Budget) -> bool {
        if self.node_ids.contains(&node.id) {
            return true;
        }
        if !budget.take_node() {
            return false;
        }
        self.node_ids.insert(node.id.clone());
        self.nodes.push(node);
        true
    }

    /// Register an edge against the edge budget, same rules as [`Self::put_node`].
    pub fn put_edge(&mut self, edge: GraphEdge, budget: &mut Budget) -> bool {
        if self.edge_ids.contains(&edge.id) {
            return true;
        }
        if !budget.take_edge() {
            return false;
        }
        self.edge_ids.insert(edge.id.clone());
        self.edges.push(edge);
        true
    }

    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}
