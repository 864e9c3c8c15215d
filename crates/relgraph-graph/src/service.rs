//! Request-facing facade over the graph operations.

use std::sync::Arc;

use chrono::Utc;
use relgraph_core::{
    CustomerEvent, GraphEdge, ManualEdgeRequest, MetadataResponse, SubgraphRequest,
    SubgraphResponse,
};
use relgraph_store::GraphStore;

use crate::error::GraphResult;
use crate::ingest::{self, BatchOutcome, IngestOutcome};
use crate::settings::GraphSettings;
use crate::{manual, metadata, traversal};

/// Shared by all requests; holds no per-request state.
#[derive(Clone)]
pub struct GraphService {
    store: Arc<dyn GraphStore>,
    settings: GraphSettings,
}

impl GraphService {
    pub fn new(store: Arc<dyn GraphStore>, settings: GraphSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn GraphStore {
        self.store.as_ref()
    }

    pub async fn subgraph(&self, req: &SubgraphRequest) -> GraphResult<SubgraphResponse> {
        traversal::subgraph(self.store(), &self.settings, req, now_ms()).await
    }

    pub async fn ingest_event(&self, ev: &CustomerEvent) -> GraphResult<IngestOutcome> {
        ingest::ingest_event(self.store(), self.settings.event_type_policy, ev).await
    }

    pub async fn ingest_batch(&self, events: &[CustomerEvent]) -> BatchOutcome {
        ingest::ingest_batch(self.store(), self.settings.event_type_policy, events).await
    }

    pub async fn create_manual_edge(&self, req: &ManualEdgeRequest) -> GraphResult<GraphEdge> {
        manual::create_manual_edge(self.store(), req, now_ms()).await
    }

    pub async fn metadata(&self) -> GraphResult<MetadataResponse> {
        metadata::metadata(self.store(), self.settings.event_type_policy).await
    }

    pub async fn ping(&self) -> GraphResult<()> {
        Ok(self.store.ping().await?)
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
