//! Vocabulary exposed to clients.

use relgraph_core::{
    EventTypePolicy, MetadataResponse, NodeType, RankMetric, CURATED_EVENT_TYPES,
};
use relgraph_store::cypher::{self, columns};
use relgraph_store::GraphStore;

use crate::error::GraphResult;

/// Node types, edge types and rank metrics. Under the curated policy the
/// edge types are the fixed list; otherwise whatever the graph contains.
pub async fn metadata(
    store: &dyn GraphStore,
    policy: EventTypePolicy,
) -> GraphResult<MetadataResponse> {
    let edge_types = match policy {
        EventTypePolicy::Curated => CURATED_EVENT_TYPES.iter().map(|t| t.to_string()).collect(),
        EventTypePolicy::Dynamic => store
            .execute(&cypher::relationship_types())
            .await?
            .iter()
            .map(|row| row.str(columns::RELATIONSHIP_TYPE).to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    };

    Ok(MetadataResponse {
        node_types: NodeType::ALL.iter().map(|t| t.as_str().to_string()).collect(),
        edge_types,
        rank_metrics: RankMetric::ALL.iter().map(|m| m.property().to_string()).collect(),
    })
}
