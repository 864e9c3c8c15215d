//! Budgeted subgraph traversal.
//!
//! Starting from a root user, odd hops expand users outward to the entities
//! they point at and even hops expand entities inward to the users pointing
//! at them. Each hop spends a share of the remaining edge budget, split
//! evenly across the frontier, so store round-trips and payload size stay
//! bounded however dense the graph is. Running out of budget is not an
//! error: the partial result comes back with `truncated` set.

pub mod accumulator;
pub mod budget;
pub mod expansion;

use std::collections::HashSet;

use relgraph_core::{
    node_id, GraphNode, NodeType, SubgraphRequest, SubgraphResponse, Token, ValidationError,
    RESPONSE_VERSION,
};
use relgraph_store::cypher::{self, columns, ExpansionFilter};
use relgraph_store::{GraphQuery, GraphStore};
use tracing::{debug, info};

use crate::error::GraphResult;
use crate::settings::GraphSettings;

use accumulator::Accumulator;
use budget::{Budget, HopPlan};
use expansion::ExpansionRow;

/// A validated traversal request with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalPlan {
    pub root_key: String,
    pub hops: i64,
    pub max_nodes: i64,
    pub max_edges: i64,
    pub filter: ExpansionFilter,
}

impl TraversalPlan {
    /// Validate `req` and resolve its defaults. No store access.
    pub fn from_request(
        req: &SubgraphRequest,
        settings: &GraphSettings,
        now_ms: i64,
    ) -> Result<Self, ValidationError> {
        if NodeType::parse(&req.root.node_type)? != NodeType::User {
            return Err(ValidationError::invalid("root.type must be USER"));
        }
        let root_key = req.root.key.trim();
        if root_key.is_empty() {
            return Err(ValidationError::Missing("root.key"));
        }

        if req.hops < 1 {
            return Err(ValidationError::invalid("hops must be >= 1"));
        }
        if let Some(max_hops) = settings.max_hops {
            if req.hops > max_hops {
                return Err(ValidationError::invalid(format!("hops must be <= {max_hops}")));
            }
        }

        let min_event_count = req
            .min_event_count
            .unwrap_or(settings.default_min_event_count);
        if min_event_count < 0 {
            return Err(ValidationError::invalid("min_event_count must be >= 0"));
        }
        if req.time_window_ms < 0 {
            return Err(ValidationError::invalid("time_window_ms must be >= 0"));
        }

        let mut edge_types: Vec<Token> = Vec::with_capacity(req.edge_types.len());
        for raw in &req.edge_types {
            let token = Token::edge_type(raw)?;
            if !edge_types.contains(&token) {
                edge_types.push(token);
            }
        }

        let window_start = if req.time_window_ms > 0 {
            now_ms.saturating_sub(req.time_window_ms)
        } else {
            0
        };

        Ok(Self {
            root_key: root_key.to_string(),
            hops: req.hops,
            max_nodes: if req.limit.max_nodes > 0 {
                req.limit.max_nodes
            } else {
                settings.default_max_nodes
            },
            max_edges: if req.limit.max_edges > 0 {
                req.limit.max_edges
            } else {
                settings.default_max_edges
            },
            filter: ExpansionFilter {
                edge_types,
                min_event_count,
                window_start,
                rank: settings.rank,
            },
        })
    }
}

/// Which side of the bipartite graph a hop starts from.
#[derive(Debug, Clone, PartialEq)]
enum Frontier {
    /// User keys, expanded outward.
    Users(Vec<String>),
    /// Entity internal ids, expanded inward.
    Entities(Vec<i64>),
}

impl Frontier {
    fn len(&self) -> usize {
        match self {
            Self::Users(keys) => keys.len(),
            Self::Entities(ids) => ids.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn queries(&self, filter: &ExpansionFilter, limit: i64) -> Vec<GraphQuery> {
        match self {
            Self::Users(keys) => keys
                .iter()
                .map(|key| cypher::user_to_entity(key, filter, limit))
                .collect(),
            Self::Entities(ids) => ids
                .iter()
                .map(|id| cypher::entity_to_user(*id, filter, limit))
                .collect(),
        }
    }
}

/// State of one traversal call.
struct Traversal<'a> {
    store: &'a dyn GraphStore,
    filter: &'a ExpansionFilter,
    budget: Budget,
    acc: Accumulator,
    /// Ids of nodes already queued for expansion on some hop. A node is
    /// expanded at most once, so round-trips stay bounded on cyclic graphs.
    expanded: HashSet<String>,
    skipped_rows: usize,
}

impl<'a> Traversal<'a> {
    /// Run one hop's source queries in frontier order and return the newly
    /// reached neighbours (entities on outward hops, users on inward hops)
    /// that no earlier hop has queued.
    async fn expand(&mut self, frontier: &Frontier, limit: i64) -> GraphResult<Vec<GraphNode>> {
        let outward = matches!(frontier, Frontier::Users(_));
        let mut next = Vec::new();

        'sources: for query in frontier.queries(self.filter, limit) {
            if self.budget.exhausted() {
                self.budget.truncate();
                break;
            }

            let rows = self.store.execute(&query).await?;
            for row in &rows {
                let Some(row) = ExpansionRow::parse(row) else {
                    self.skipped_rows += 1;
                    continue;
                };

                let from = row.from_node();
                let to = row.to_node();
                let from_present = self.acc.put_node(from.clone(), &mut self.budget);
                let to_present = self.acc.put_node(to.clone(), &mut self.budget);
                if from_present && to_present {
                    let edge = row.edge(from.id.clone(), to.id.clone());
                    self.acc.put_edge(edge, &mut self.budget);
                }

                let (neighbour, present) = if outward {
                    (to, to_present)
                } else {
                    (from, from_present)
                };
                if present && self.expanded.insert(neighbour.id.clone()) {
                    next.push(neighbour);
                }

                if self.budget.exhausted() {
                    self.budget.truncate();
                    break 'sources;
                }
            }
        }

        Ok(next)
    }

    /// Map entity nodes to internal ids for the next inward hop. Entities
    /// the store no longer knows are dropped.
    async fn resolve_entities(&self, entities: &[GraphNode]) -> GraphResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(entities.len());
        for entity in entities {
            let query = cypher::entity_internal_id(entity.node_type, &entity.key);
            let rows = self.store.execute(&query).await?;
            match rows.first().map(|row| row.i64(columns::ENTITY_ID)) {
                Some(Ok(id)) => ids.push(id),
                _ => debug!(entity = %entity.id, "entity id not resolved"),
            }
        }
        Ok(ids)
    }
}

/// Collect the bounded neighbourhood of a root user.
///
/// Validation happens before any store call. Store failures fail the whole
/// traversal; only budget exhaustion yields a partial (truncated) result.
pub async fn subgraph(
    store: &dyn GraphStore,
    settings: &GraphSettings,
    req: &SubgraphRequest,
    now_ms: i64,
) -> GraphResult<SubgraphResponse> {
    let plan = TraversalPlan::from_request(req, settings, now_ms)?;
    let root = GraphNode::new(NodeType::User, &plan.root_key);
    let root_id = node_id(NodeType::User, &plan.root_key);

    let mut traversal = Traversal {
        store,
        filter: &plan.filter,
        budget: Budget::new(plan.max_nodes, plan.max_edges),
        acc: Accumulator::new(),
        expanded: HashSet::from([root_id.clone()]),
        skipped_rows: 0,
    };
    traversal.acc.put_node(root, &mut traversal.budget);

    let mut frontier = Frontier::Users(vec![plan.root_key.clone()]);
    for hop in 1..=plan.hops {
        if traversal.budget.is_truncated() || frontier.is_empty() {
            break;
        }

        let limit = HopPlan::for_hop(hop).per_source_limit(
            traversal.budget.remaining_edges,
            frontier.len(),
        );
        if limit == 0 {
            traversal.budget.truncate();
            break;
        }
        debug!(hop, frontier = frontier.len(), limit, "expanding hop");

        let reached = traversal.expand(&frontier, limit).await?;
        frontier = match frontier {
            Frontier::Users(_) if traversal.budget.is_truncated() || hop == plan.hops => {
                Frontier::Entities(Vec::new())
            }
            Frontier::Users(_) => Frontier::Entities(traversal.resolve_entities(&reached).await?),
            Frontier::Entities(_) => Frontier::Users(reached.into_iter().map(|n| n.key).collect()),
        };
    }

    if traversal.skipped_rows > 0 {
        debug!(skipped = traversal.skipped_rows, "skipped unusable rows");
    }

    let truncated = traversal.budget.is_truncated();
    let (nodes, edges) = traversal.acc.into_parts();
    info!(
        root = %root_id,
        hops = plan.hops,
        nodes = nodes.len(),
        edges = edges.len(),
        truncated,
        "Subgraph collected"
    );

    Ok(SubgraphResponse {
        version: RESPONSE_VERSION.to_string(),
        root: root_id,
        nodes,
        edges,
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeStore;
    use relgraph_core::{Limit, NodeRef};
    use relgraph_store::QueryShape;

    const NOW: i64 = 10_000_000_000;

    fn request(hops: i64) -> SubgraphRequest {
        SubgraphRequest {
            root: NodeRef::new("USER", "u1"),
            hops,
            ..Default::default()
        }
    }

    fn limited(hops: i64, max_nodes: i64, max_edges: i64) -> SubgraphRequest {
        SubgraphRequest {
            limit: Limit { max_nodes, max_edges },
            ..request(hops)
        }
    }

    /// u1 -> m1, m2; u2 -> m1; u3 -> m2, d9
    fn small_graph() -> FakeStore {
        let store = FakeStore::new();
        store.seed_edge("u1", NodeType::Merchant, "m1", "PAYMENT", 5, NOW - 1000);
        store.seed_edge("u1", NodeType::Merchant, "m2", "PAYMENT", 3, NOW - 1000);
        store.seed_edge("u2", NodeType::Merchant, "m1", "PAYMENT", 2, NOW - 1000);
        store.seed_edge("u3", NodeType::Merchant, "m2", "PAYMENT", 1, NOW - 1000);
        store.seed_edge("u3", NodeType::Device, "d9", "LOGIN", 7, NOW - 1000);
        store
    }

    fn node_ids(resp: &SubgraphResponse) -> Vec<&str> {
        resp.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_one_hop() {
        let store = small_graph();
        let resp = subgraph(&store, &GraphSettings::default(), &request(1), NOW)
            .await
            .unwrap();

        assert_eq!(resp.version, "1.0");
        assert_eq!(resp.root, "USER:u1");
        assert_eq!(node_ids(&resp), ["USER:u1", "MERCHANT:m1", "MERCHANT:m2"]);
        assert_eq!(resp.edges.len(), 2);
        assert!(!resp.truncated);
        assert!(resp.edges.iter().all(|e| e.directed && !e.manual));
        assert_eq!(resp.nodes[1].label, "Merchant m1");
        // No id resolution on the final hop.
        assert!(!store.calls().contains(&QueryShape::EntityInternalId));
    }

    #[tokio::test]
    async fn test_three_hops_alternate() {
        let store = small_graph();
        let resp = subgraph(&store, &GraphSettings::default(), &request(3), NOW)
            .await
            .unwrap();

        let ids = node_ids(&resp);
        for id in ["USER:u1", "MERCHANT:m1", "MERCHANT:m2", "USER:u2", "USER:u3", "DEVICE:d9"] {
            assert!(ids.contains(&id), "missing {id}");
        }
        assert_eq!(resp.edges.len(), 5);
        assert!(!resp.truncated);

        // Inward rows keep the stored direction.
        let u2_edge = resp.edges.iter().find(|e| e.from == "USER:u2").unwrap();
        assert_eq!(u2_edge.to, "MERCHANT:m1");
        assert_eq!(u2_edge.id, relgraph_core::edge_id("USER:u2", "MERCHANT:m1", "PAYMENT"));
    }

    #[tokio::test]
    async fn test_single_edge_budget_truncates() {
        let store = FakeStore::new();
        for i in 0..5 {
            store.seed_edge("u1", NodeType::Merchant, &format!("m{i}"), "PAYMENT", 1, NOW);
        }
        let resp = subgraph(&store, &GraphSettings::default(), &limited(1, 0, 1), NOW)
            .await
            .unwrap();
        assert_eq!(resp.edges.len(), 1);
        assert!(resp.truncated);
    }

    #[tokio::test]
    async fn test_node_budget_counts_root() {
        let store = small_graph();
        let resp = subgraph(&store, &GraphSettings::default(), &limited(3, 1, 100), NOW)
            .await
            .unwrap();
        assert_eq!(node_ids(&resp), ["USER:u1"]);
        assert!(resp.edges.is_empty());
        assert!(resp.truncated);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_never_exceeds_budget() {
        let store = FakeStore::new();
        for u in 0..6 {
            for m in 0..6 {
                store.seed_edge(&format!("u{u}"), NodeType::Merchant, &format!("m{m}"), "PAYMENT", 1, NOW);
            }
        }
        for (max_nodes, max_edges) in [(1, 1), (2, 1), (3, 5), (5, 3), (8, 20), (40, 40)] {
            let req = SubgraphRequest {
                root: NodeRef::new("USER", "u0"),
                ..limited(4, max_nodes, max_edges)
            };
            let resp = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
            assert!(resp.nodes.len() as i64 <= max_nodes);
            assert!(resp.edges.len() as i64 <= max_edges);
            for edge in &resp.edges {
                assert!(resp.nodes.iter().any(|n| n.id == edge.from));
                assert!(resp.nodes.iter().any(|n| n.id == edge.to));
            }
        }
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let store = small_graph();
        let req = limited(3, 4, 3);
        let first = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
        let second = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_min_event_count_and_type_filter() {
        let store = small_graph();
        let req = SubgraphRequest {
            min_event_count: Some(4),
            ..request(1)
        };
        let resp = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
        assert_eq!(node_ids(&resp), ["USER:u1", "MERCHANT:m1"]);

        let req = SubgraphRequest {
            root: NodeRef::new("USER", "u3"),
            edge_types: vec!["login".into()],
            ..request(1)
        };
        let resp = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
        assert_eq!(node_ids(&resp), ["USER:u3", "DEVICE:d9"]);
        assert_eq!(resp.edges[0].edge_type, "LOGIN");
    }

    #[tokio::test]
    async fn test_time_window() {
        let store = FakeStore::new();
        store.seed_edge("u1", NodeType::Merchant, "recent", "PAYMENT", 1, NOW - 10);
        store.seed_edge("u1", NodeType::Merchant, "stale", "PAYMENT", 1, NOW - 5_000);
        let req = SubgraphRequest {
            time_window_ms: 1_000,
            ..request(1)
        };
        let resp = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
        assert_eq!(node_ids(&resp), ["USER:u1", "MERCHANT:recent"]);
    }

    #[tokio::test]
    async fn test_manual_edges_bypass_min_count() {
        let store = small_graph();
        store.seed_manual(NodeType::User, "u1", NodeType::Device, "d1", "REVIEWED", NOW);
        let req = SubgraphRequest {
            min_event_count: Some(100),
            ..request(1)
        };
        let resp = subgraph(&store, &GraphSettings::default(), &req, NOW).await.unwrap();
        assert_eq!(resp.edges.len(), 1);
        assert!(resp.edges[0].manual);
        assert!(resp.edges[0].stats.is_none());
    }

    #[tokio::test]
    async fn test_unusable_rows_are_skipped() {
        let store = small_graph();
        store.inject_row(QueryShape::UserToEntity, &[("from_type", "USER"), ("to_type", "UNKNOWN")]);
        let resp = subgraph(&store, &GraphSettings::default(), &request(1), NOW).await.unwrap();
        assert_eq!(resp.edges.len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_fails_traversal() {
        let store = small_graph();
        store.fail_on(QueryShape::EntityToUser);
        let err = subgraph(&store, &GraphSettings::default(), &request(2), NOW)
            .await
            .unwrap_err();
        assert!(!err.is_validation());
    }

    #[tokio::test]
    async fn test_empty_frontier_is_not_truncation() {
        let store = FakeStore::new();
        let resp = subgraph(&store, &GraphSettings::default(), &request(3), NOW).await.unwrap();
        assert_eq!(node_ids(&resp), ["USER:u1"]);
        assert!(!resp.truncated);
        assert_eq!(store.calls(), [QueryShape::UserToEntity]);
    }

    #[tokio::test]
    async fn test_cycle_does_not_scale_with_hops() {
        let store = FakeStore::new();
        store.seed_edge("u1", NodeType::Merchant, "m1", "PAYMENT", 1, NOW);
        let resp = subgraph(&store, &GraphSettings::default(), &request(2000), NOW)
            .await
            .unwrap();

        assert_eq!(node_ids(&resp), ["USER:u1", "MERCHANT:m1"]);
        assert_eq!(resp.edges.len(), 1);
        assert!(!resp.truncated);
        assert_eq!(
            store.calls(),
            [
                QueryShape::UserToEntity,
                QueryShape::EntityInternalId,
                QueryShape::EntityToUser,
            ]
        );
    }

    #[tokio::test]
    async fn test_known_users_are_not_expanded_again() {
        let store = small_graph();
        subgraph(&store, &GraphSettings::default(), &request(4), NOW).await.unwrap();

        // u1 on hop 1, u2 and u3 on hop 3; hop 4 reaches only u3 again
        let outward = store
            .calls()
            .iter()
            .filter(|s| **s == QueryShape::UserToEntity)
            .count();
        assert_eq!(outward, 3);
    }

    #[tokio::test]
    async fn test_validation_precedes_store_access() {
        let store = small_graph();
        let settings = GraphSettings::default();
        let bad = [
            SubgraphRequest {
                root: NodeRef::new("MERCHANT", "m1"),
                ..request(1)
            },
            SubgraphRequest {
                root: NodeRef::new("USER", "  "),
                ..request(1)
            },
            request(0),
            SubgraphRequest {
                min_event_count: Some(-1),
                ..request(1)
            },
            SubgraphRequest {
                edge_types: vec!["PAYMENT) DETACH DELETE n //".into()],
                ..request(1)
            },
            SubgraphRequest {
                time_window_ms: -1,
                ..request(1)
            },
        ];
        for req in bad {
            let err = subgraph(&store, &settings, &req, NOW).await.unwrap_err();
            assert!(err.is_validation(), "{err}");
        }
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_strict_mode_caps_hops() {
        let store = small_graph();
        let settings = GraphSettings::default().strict();
        assert!(subgraph(&store, &settings, &request(3), NOW).await.is_ok());
        let err = subgraph(&store, &settings, &request(4), NOW).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_plan_defaults() {
        let plan = TraversalPlan::from_request(&request(2), &GraphSettings::default(), NOW).unwrap();
        assert_eq!(plan.max_nodes, 200);
        assert_eq!(plan.max_edges, 400);
        assert_eq!(plan.filter.min_event_count, 1);
        assert_eq!(plan.filter.window_start, 0);

        let req = SubgraphRequest {
            edge_types: vec!["payment".into(), "PAYMENT".into()],
            time_window_ms: 500,
            ..request(2)
        };
        let plan = TraversalPlan::from_request(&req, &GraphSettings::default(), NOW).unwrap();
        assert_eq!(plan.filter.edge_types.len(), 1);
        assert_eq!(plan.filter.window_start, NOW - 500);
    }
}
