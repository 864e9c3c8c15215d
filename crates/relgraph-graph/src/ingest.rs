//! Folding customer events into aggregated edges.

use relgraph_core::{CustomerEvent, EventTypePolicy, IngestResponse, ValidationError};
use relgraph_store::{cypher, GraphStore};
use tracing::{debug, info, warn};

use crate::error::{GraphError, GraphResult};

/// What a single accepted event did to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The event was folded into a `user -> target` edge.
    Applied,
    /// No target selector was set; accepted without an edge.
    NoTarget,
}

/// Result of a batch: the response body plus the error that stopped it.
#[derive(Debug)]
pub struct BatchOutcome {
    pub response: IngestResponse,
    pub error: Option<GraphError>,
}

/// Validate one event and apply it with a single upsert.
///
/// Checks run in order: user id, event type, timestamp. An event without any
/// target selector is accepted but creates nothing.
pub async fn ingest_event(
    store: &dyn GraphStore,
    policy: EventTypePolicy,
    ev: &CustomerEvent,
) -> GraphResult<IngestOutcome> {
    let user_id = ev.user_id.trim();
    if user_id.is_empty() {
        return Err(ValidationError::Missing("user_id").into());
    }
    let edge_type = policy.parse_event_type(&ev.event_type)?;
    let ts = ev.timestamp_millis()?;

    let Some(target) = ev.choose_target() else {
        debug!(user_id, event_type = %edge_type, "event has no target, skipped");
        return Ok(IngestOutcome::NoTarget);
    };

    let query = cypher::upsert_aggregated(
        user_id,
        target.node_type,
        &target.key,
        &edge_type,
        ts,
        ev.total_amount.unwrap_or(0.0),
    );
    store.execute(&query).await?;

    debug!(
        user_id,
        target = %target.node_type.as_str(),
        key = %target.key,
        event_type = %edge_type,
        ts,
        "event applied"
    );
    Ok(IngestOutcome::Applied)
}

/// Apply `events` strictly in order, stopping at the first failure.
///
/// Events applied before the failure stay applied.
pub async fn ingest_batch(
    store: &dyn GraphStore,
    policy: EventTypePolicy,
    events: &[CustomerEvent],
) -> BatchOutcome {
    let mut accepted_count = 0;

    for (index, ev) in events.iter().enumerate() {
        if let Err(e) = ingest_event(store, policy, ev).await {
            warn!(index, accepted_count, error = %e, "ingest batch stopped");
            return BatchOutcome {
                response: IngestResponse {
                    accepted: false,
                    accepted_count,
                    failed_count: events.len() - accepted_count,
                    failed_index: Some(index),
                    error: Some(e.to_string()),
                },
                error: Some(e),
            };
        }
        accepted_count += 1;
    }

    info!(accepted_count, "ingest batch applied");
    BatchOutcome {
        response: IngestResponse {
            accepted: true,
            accepted_count,
            failed_count: 0,
            failed_index: None,
            error: None,
        },
        error: None,
    }
}
