//! In-memory `GraphStore` for tests.
//!
//! Interprets the structured query shapes and their bound parameters the way
//! the Cypher templates behave against FalkorDB, and records every call.

use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use relgraph_core::{NodeType, RankMetric};
use relgraph_store::cypher::{columns, WINDOW_30D_MS};
use relgraph_store::{
    GraphQuery, GraphStore, GraphValue, ParamValue, QueryShape, Row, StoreError, StoreResult,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeNode {
    pub node_type: NodeType,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeEdge {
    pub from: usize,
    pub to: usize,
    pub edge_type: String,
    pub manual: bool,
    pub event_count: i64,
    pub event_count_30d: i64,
    pub window_start_30d: i64,
    pub first_seen: i64,
    pub last_seen: i64,
    pub total_amount: f64,
    pub max_amount: f64,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

#[derive(Default)]
struct FakeGraph {
    /// Index is the internal node id.
    nodes: Vec<FakeNode>,
    edges: Vec<FakeEdge>,
}

impl FakeGraph {
    fn find_node(&self, node_type: NodeType, key: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.node_type == node_type && n.key == key)
    }

    fn merge_node(&mut self, node_type: NodeType, key: &str) -> usize {
        self.find_node(node_type, key).unwrap_or_else(|| {
            self.nodes.push(FakeNode {
                node_type,
                key: key.to_string(),
            });
            self.nodes.len() - 1
        })
    }

    /// Returns the edge index and whether it was created.
    fn merge_edge(&mut self, from: usize, to: usize, edge_type: &str) -> (usize, bool) {
        match self
            .edges
            .iter()
            .position(|e| e.from == from && e.to == to && e.edge_type == edge_type)
        {
            Some(i) => (i, false),
            None => {
                self.edges.push(FakeEdge {
                    from,
                    to,
                    edge_type: edge_type.to_string(),
                    ..Default::default()
                });
                (self.edges.len() - 1, true)
            }
        }
    }
}

#[derive(Default)]
pub struct FakeStore {
    graph: Mutex<FakeGraph>,
    calls: Mutex<Vec<QueryShape>>,
    fail_on: Mutex<Option<QueryShape>>,
    injected: Mutex<Vec<(QueryShape, Row)>>,
}

fn label_type(label: Option<&str>) -> StoreResult<NodeType> {
    NodeType::ALL
        .into_iter()
        .find(|t| Some(t.label()) == label)
        .ok_or_else(|| StoreError::Decode(format!("unknown label {label:?}")))
}

fn str_param<'q>(query: &'q GraphQuery, name: &str) -> StoreResult<&'q str> {
    query
        .get_param(name)
        .and_then(ParamValue::as_str)
        .ok_or_else(|| StoreError::Decode(format!("missing string param {name}")))
}

fn int_param(query: &GraphQuery, name: &str) -> StoreResult<i64> {
    query
        .get_param(name)
        .and_then(ParamValue::as_i64)
        .ok_or_else(|| StoreError::Decode(format!("missing integer param {name}")))
}

fn rank_of(query: &GraphQuery) -> RankMetric {
    RankMetric::ALL
        .into_iter()
        .find(|m| query.body().contains(&format!("coalesce(r.{}, 0) DESC", m.property())))
        .unwrap_or_default()
}

fn rank_value(edge: &FakeEdge, rank: RankMetric) -> f64 {
    match rank {
        RankMetric::EventCount30d => edge.event_count_30d as f64,
        RankMetric::EventCount => edge.event_count as f64,
        RankMetric::TotalAmount => edge.total_amount,
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregated edge `user -> entity` with `count` events, last seen at `last_seen`.
    pub fn seed_edge(
        &self,
        user: &str,
        node_type: NodeType,
        key: &str,
        edge_type: &str,
        count: i64,
        last_seen: i64,
    ) {
        let mut graph = self.graph.lock().unwrap();
        let from = graph.merge_node(NodeType::User, user);
        let to = graph.merge_node(node_type, key);
        let (i, _) = graph.merge_edge(from, to, edge_type);
        let edge = &mut graph.edges[i];
        edge.event_count = count;
        edge.event_count_30d = count;
        edge.first_seen = last_seen;
        edge.last_seen = last_seen;
        edge.window_start_30d = last_seen;
    }

    pub fn seed_manual(
        &self,
        from_type: NodeType,
        from_key: &str,
        to_type: NodeType,
        to_key: &str,
        edge_type: &str,
        ts: i64,
    ) {
        let mut graph = self.graph.lock().unwrap();
        let from = graph.merge_node(from_type, from_key);
        let to = graph.merge_node(to_type, to_key);
        let (i, _) = graph.merge_edge(from, to, edge_type);
        graph.edges[i].manual = true;
        graph.edges[i].created_at = Some(ts);
        graph.edges[i].updated_at = Some(ts);
    }

    /// Every subsequent query of `shape` fails with a timeout.
    pub fn fail_on(&self, shape: QueryShape) {
        *self.fail_on.lock().unwrap() = Some(shape);
    }

    /// Append a raw string row to every result of `shape`.
    pub fn inject_row(&self, shape: QueryShape, cells: &[(&str, &str)]) {
        let row = Row::from_pairs(cells.iter().map(|(k, v)| (*k, GraphValue::from(*v))));
        self.injected.lock().unwrap().push((shape, row));
    }

    pub fn calls(&self) -> Vec<QueryShape> {
        self.calls.lock().unwrap().clone()
    }

    pub fn edge(
        &self,
        from: (NodeType, &str),
        to: (NodeType, &str),
        edge_type: &str,
    ) -> Option<FakeEdge> {
        let graph = self.graph.lock().unwrap();
        let from = graph.find_node(from.0, from.1)?;
        let to = graph.find_node(to.0, to.1)?;
        graph
            .edges
            .iter()
            .find(|e| e.from == from && e.to == to && e.edge_type == edge_type)
            .cloned()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.lock().unwrap().edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.graph.lock().unwrap().nodes.len()
    }

    fn expand(&self, graph: &FakeGraph, query: &GraphQuery) -> StoreResult<Vec<Row>> {
        let anchor = match query.shape() {
            QueryShape::UserToEntity => graph.find_node(NodeType::User, str_param(query, "user_id")?),
            _ => Some(int_param(query, "entity_id")? as usize),
        };
        let Some(anchor) = anchor else {
            return Ok(Vec::new());
        };

        let edge_types: Option<Vec<&str>> = match query.get_param("edge_types") {
            Some(ParamValue::List(items)) => Some(items.iter().filter_map(ParamValue::as_str).collect()),
            _ => None,
        };
        let min_event_count = int_param(query, "min_event_count")?;
        let window_start = int_param(query, "window_start")?;
        let limit = int_param(query, "limit")?.max(0) as usize;
        let outward = query.shape() == QueryShape::UserToEntity;

        let mut matched: Vec<&FakeEdge> = graph
            .edges
            .iter()
            .filter(|e| if outward { e.from == anchor } else { e.to == anchor })
            .filter(|e| graph.nodes[e.from].node_type == NodeType::User)
            .filter(|e| edge_types.as_ref().is_none_or(|t| t.contains(&e.edge_type.as_str())))
            .filter(|e| e.manual || e.event_count >= min_event_count)
            .filter(|e| {
                let seen = if e.last_seen > 0 {
                    e.last_seen
                } else {
                    e.updated_at.unwrap_or(0)
                };
                seen >= window_start
            })
            .collect();

        let rank = rank_of(query);
        matched.sort_by(|a, b| {
            rank_value(b, rank)
                .total_cmp(&rank_value(a, rank))
                .then_with(|| graph.nodes[a.from].key.cmp(&graph.nodes[b.from].key))
                .then_with(|| graph.nodes[a.to].node_type.as_str().cmp(graph.nodes[b.to].node_type.as_str()))
                .then_with(|| graph.nodes[a.to].key.cmp(&graph.nodes[b.to].key))
                .then_with(|| a.edge_type.cmp(&b.edge_type))
        });
        matched.truncate(limit);

        Ok(matched
            .into_iter()
            .map(|e| {
                let from = &graph.nodes[e.from];
                let to = &graph.nodes[e.to];
                let to_type = if to.node_type.is_entity() {
                    to.node_type.as_str()
                } else {
                    "UNKNOWN"
                };
                Row::from_pairs([
                    (columns::FROM_TYPE, GraphValue::from("USER")),
                    (columns::FROM_KEY, GraphValue::from(from.key.as_str())),
                    (columns::TO_TYPE, GraphValue::from(to_type)),
                    (columns::TO_KEY, GraphValue::from(to.key.as_str())),
                    (columns::EDGE_TYPE, GraphValue::from(e.edge_type.as_str())),
                    (columns::EDGE_MANUAL, GraphValue::from(e.manual)),
                    (columns::EVENT_COUNT, GraphValue::from(e.event_count)),
                    (columns::EVENT_COUNT_30D, GraphValue::from(e.event_count_30d)),
                    (columns::DISTINCT_IP_COUNT_30D, GraphValue::from(0i64)),
                    (columns::FIRST_SEEN, GraphValue::from(e.first_seen)),
                    (columns::LAST_SEEN, GraphValue::from(e.last_seen)),
                    (columns::TOTAL_AMOUNT, GraphValue::from(e.total_amount)),
                    (columns::MAX_AMOUNT, GraphValue::from(e.max_amount)),
                ])
            })
            .collect())
    }

    fn upsert_aggregated(&self, graph: &mut FakeGraph, query: &GraphQuery) -> StoreResult<Vec<Row>> {
        let target_type = label_type(query.get_token("label"))?;
        let edge_type = query
            .get_token("edge_type")
            .ok_or_else(|| StoreError::Decode("missing edge type".into()))?;
        let ts = int_param(query, "ts")?;
        let amount = query
            .get_param("amount")
            .and_then(ParamValue::as_f64)
            .unwrap_or(0.0);

        let from = graph.merge_node(NodeType::User, str_param(query, "user_id")?);
        let to = graph.merge_node(target_type, str_param(query, "target_key")?);
        let (i, created) = graph.merge_edge(from, to, edge_type);
        let edge = &mut graph.edges[i];
        if created {
            edge.first_seen = ts;
            edge.last_seen = ts;
            edge.window_start_30d = ts;
        }
        edge.event_count += 1;
        edge.first_seen = edge.first_seen.min(ts);
        edge.last_seen = edge.last_seen.max(ts);
        if ts - edge.window_start_30d > WINDOW_30D_MS {
            edge.event_count_30d = 1;
            edge.window_start_30d = ts;
        } else {
            edge.event_count_30d += 1;
        }
        edge.total_amount += amount;
        if amount > edge.max_amount {
            edge.max_amount = amount;
        }

        Ok(vec![Row::from_pairs([
            (columns::EVENT_COUNT, GraphValue::from(edge.event_count)),
            (columns::EVENT_COUNT_30D, GraphValue::from(edge.event_count_30d)),
        ])])
    }

    fn upsert_manual(&self, graph: &mut FakeGraph, query: &GraphQuery) -> StoreResult<Vec<Row>> {
        let from_type = label_type(query.get_token("from_label"))?;
        let to_type = label_type(query.get_token("to_label"))?;
        let edge_type = query
            .get_token("edge_type")
            .ok_or_else(|| StoreError::Decode("missing edge type".into()))?;
        let ts = int_param(query, "ts")?;

        let from = graph.merge_node(from_type, str_param(query, "from_key")?);
        let to = graph.merge_node(to_type, str_param(query, "to_key")?);
        let (i, created) = graph.merge_edge(from, to, edge_type);
        let edge = &mut graph.edges[i];
        if created {
            edge.created_at = Some(ts);
        }
        edge.manual = true;
        edge.updated_at = Some(ts);
        Ok(Vec::new())
    }
}

#[async_trait]
impl GraphStore for FakeStore {
    async fn execute(&self, query: &GraphQuery) -> StoreResult<Vec<Row>> {
        self.calls.lock().unwrap().push(query.shape());
        if *self.fail_on.lock().unwrap() == Some(query.shape()) {
            return Err(StoreError::Timeout(std::time::Duration::from_millis(1)));
        }

        let mut graph = self.graph.lock().unwrap();
        let mut rows = match query.shape() {
            QueryShape::Ping | QueryShape::CreateIndex => Vec::new(),
            QueryShape::UserToEntity | QueryShape::EntityToUser => self.expand(&graph, query)?,
            QueryShape::EntityInternalId => {
                let node_type = label_type(query.get_token("label"))?;
                match graph.find_node(node_type, str_param(query, "key")?) {
                    Some(id) => vec![Row::from_pairs([(columns::ENTITY_ID, GraphValue::from(id as i64))])],
                    None => Vec::new(),
                }
            }
            QueryShape::UpsertAggregated => self.upsert_aggregated(&mut graph, query)?,
            QueryShape::UpsertManual => self.upsert_manual(&mut graph, query)?,
            QueryShape::RelationshipTypes => graph
                .edges
                .iter()
                .map(|e| e.edge_type.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|t| Row::from_pairs([(columns::RELATIONSHIP_TYPE, GraphValue::from(t))]))
                .collect(),
        };

        rows.extend(
            self.injected
                .lock()
                .unwrap()
                .iter()
                .filter(|(shape, _)| *shape == query.shape())
                .map(|(_, row)| row.clone()),
        );
        Ok(rows)
    }
}
