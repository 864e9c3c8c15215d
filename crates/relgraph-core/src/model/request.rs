//! Inbound request and response contracts.

use serde::{Deserialize, Serialize};

use super::edge::GraphEdge;
use super::node::{GraphNode, NodeRef};

/// Version tag carried by every subgraph response.
pub const RESPONSE_VERSION: &str = "1.0";

/// Node/edge budget for one traversal. Values `<= 0` select the configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    #[serde(default)]
    pub max_nodes: i64,
    #[serde(default)]
    pub max_edges: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubgraphRequest {
    pub root: NodeRef,
    #[serde(default)]
    pub hops: i64,
    #[serde(default)]
    pub edge_types: Vec<String>,
    /// Omitted means the configured default.
    #[serde(default)]
    pub min_event_count: Option<i64>,
    /// `0` means unbounded.
    #[serde(default)]
    pub time_window_ms: i64,
    #[serde(default)]
    pub limit: Limit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphResponse {
    pub version: String,
    pub root: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEdgeRequest {
    pub from: NodeRef,
    pub to: NodeRef,
    #[serde(default)]
    pub edge_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub node_types: Vec<String>,
    pub edge_types: Vec<String>,
    pub rank_metrics: Vec<String>,
}

/// Outcome of an ingestion batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub accepted: bool,
    pub accepted_count: usize,
    pub failed_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
