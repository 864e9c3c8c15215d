//! Cypher query templates.
//!
//! Every literal value is bound as a parameter. The only text substituted
//! into a body is node labels and key properties from [`NodeType`], rank
//! properties from [`RankMetric`], and relationship types carried as a
//! validated [`Token`].

use relgraph_core::{NodeType, RankMetric, Token};

use crate::store::{GraphQuery, QueryShape};

/// Rolling window length for `event_count_30d`, in milliseconds.
pub const WINDOW_30D_MS: i64 = 2_592_000_000;

/// Marker returned for nodes whose label is not a known entity type.
pub const UNKNOWN_NODE_TYPE: &str = "UNKNOWN";

/// Columns shared by both expansion shapes.
pub mod columns {
    pub const FROM_TYPE: &str = "from_type";
    pub const FROM_KEY: &str = "from_key";
    pub const TO_TYPE: &str = "to_type";
    pub const TO_KEY: &str = "to_key";
    pub const EDGE_TYPE: &str = "edge_type";
    pub const EDGE_MANUAL: &str = "edge_manual";
    pub const EVENT_COUNT: &str = "event_count";
    pub const EVENT_COUNT_30D: &str = "event_count_30d";
    pub const DISTINCT_IP_COUNT_30D: &str = "distinct_ip_count_30d";
    pub const FIRST_SEEN: &str = "first_seen";
    pub const LAST_SEEN: &str = "last_seen";
    pub const TOTAL_AMOUNT: &str = "total_amount";
    pub const MAX_AMOUNT: &str = "max_amount";
    pub const ENTITY_ID: &str = "entity_id";
    pub const RELATIONSHIP_TYPE: &str = "relationshipType";
}

/// Filters applied to every expansion query of a traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionFilter {
    /// Empty means every relationship type.
    pub edge_types: Vec<Token>,
    pub min_event_count: i64,
    /// Lower bound on `last_seen`; `0` for no bound.
    pub window_start: i64,
    pub rank: RankMetric,
}

/// `CASE` mapping an entity variable's label to its wire type.
fn entity_type_case(var: &str) -> String {
    let mut case = String::from("CASE");
    for node_type in NodeType::ALL.iter().filter(|t| t.is_entity()) {
        case.push_str(&format!(
            " WHEN {var}:{} THEN '{}'",
            node_type.label(),
            node_type.as_str()
        ));
    }
    case.push_str(&format!(" ELSE '{UNKNOWN_NODE_TYPE}' END"));
    case
}

/// `CASE` reading an entity variable's key property.
fn entity_key_case(var: &str) -> String {
    let mut case = String::from("CASE");
    for node_type in NodeType::ALL.iter().filter(|t| t.is_entity()) {
        case.push_str(&format!(
            " WHEN {var}:{} THEN {var}.{}",
            node_type.label(),
            node_type.key_property()
        ));
    }
    case.push_str(" ELSE '' END");
    case
}

/// Shared `WHERE` predicates and projection for `(u:User)-[r]->(n)`.
fn expansion_tail(anchor: &str, filter: &ExpansionFilter) -> String {
    let type_filter = if filter.edge_types.is_empty() {
        ""
    } else {
        "type(r) IN $edge_types AND "
    };
    let rank = filter.rank.property();

    format!(
        "WHERE {anchor}{type_filter}(coalesce(r.manual, false) = true OR coalesce(r.event_count, 0) >= $min_event_count)
  AND coalesce(r.last_seen, r.updated_at, 0) >= $window_start
RETURN
  'USER' AS from_type,
  u.user_id AS from_key,
  {to_type} AS to_type,
  {to_key} AS to_key,
  type(r) AS edge_type,
  coalesce(r.manual, false) AS edge_manual,
  coalesce(r.event_count, 0) AS event_count,
  coalesce(r.event_count_30d, 0) AS event_count_30d,
  coalesce(r.distinct_ip_count_30d, 0) AS distinct_ip_count_30d,
  coalesce(r.first_seen, 0) AS first_seen,
  coalesce(r.last_seen, 0) AS last_seen,
  coalesce(r.total_amount, 0.0) AS total_amount,
  coalesce(r.max_amount, 0.0) AS max_amount
ORDER BY coalesce(r.{rank}, 0) DESC, from_key, to_type, to_key, edge_type
LIMIT $limit",
        to_type = entity_type_case("n"),
        to_key = entity_key_case("n"),
    )
}

fn bind_filter(query: GraphQuery, filter: &ExpansionFilter, limit: i64) -> GraphQuery {
    let query = if filter.edge_types.is_empty() {
        query
    } else {
        query.param("edge_types", filter.edge_types.as_slice())
    };
    query
        .param("min_event_count", filter.min_event_count)
        .param("window_start", filter.window_start)
        .param("limit", limit)
}

/// (a) A user's outgoing edges to entities.
pub fn user_to_entity(user_key: &str, filter: &ExpansionFilter, limit: i64) -> GraphQuery {
    let body = format!(
        "MATCH (u:User {{user_id: $user_id}})-[r]->(n)\n{}",
        expansion_tail("", filter)
    );
    bind_filter(GraphQuery::new(QueryShape::UserToEntity, body), filter, limit)
        .param("user_id", user_key)
}

/// (b) The users pointing at an entity, addressed by internal id.
///
/// Rows keep the stored direction: `from` is the user, `to` the entity.
pub fn entity_to_user(entity_id: i64, filter: &ExpansionFilter, limit: i64) -> GraphQuery {
    let body = format!(
        "MATCH (u:User)-[r]->(n)\n{}",
        expansion_tail("id(n) = $entity_id AND ", filter)
    );
    bind_filter(GraphQuery::new(QueryShape::EntityToUser, body), filter, limit)
        .param("entity_id", entity_id)
}

/// (c) Resolve an entity's internal id from its type and key.
pub fn entity_internal_id(node_type: NodeType, key: &str) -> GraphQuery {
    let body = format!(
        "MATCH (n:{label} {{{prop}: $key}})\nRETURN id(n) AS entity_id\nLIMIT 1",
        label = node_type.label(),
        prop = node_type.key_property(),
    );
    GraphQuery::new(QueryShape::EntityInternalId, body)
        .token("label", node_type.label())
        .param("key", key)
}

/// (d) Fold one event into the aggregated `user -> target` edge.
///
/// Creation and counter maintenance happen in one `MERGE`, so concurrent
/// events for the same triple are serialized by the store.
pub fn upsert_aggregated(
    user_id: &str,
    target_type: NodeType,
    target_key: &str,
    edge_type: &Token,
    ts: i64,
    amount: f64,
) -> GraphQuery {
    let body = format!(
        "MERGE (u:User {{user_id: $user_id}})
MERGE (t:{label} {{{prop}: $target_key}})
MERGE (u)-[r:{edge}]->(t)
ON CREATE SET
  r.event_count = 0,
  r.first_seen = $ts,
  r.last_seen = $ts,
  r.event_count_30d = 0,
  r.distinct_ip_count_30d = 0,
  r.window_start_30d = $ts,
  r.total_amount = 0.0,
  r.max_amount = 0.0,
  r.manual = false
SET
  r.event_count = coalesce(r.event_count, 0) + 1,
  r.first_seen = CASE WHEN coalesce(r.first_seen, $ts) > $ts THEN $ts ELSE coalesce(r.first_seen, $ts) END,
  r.last_seen = CASE WHEN coalesce(r.last_seen, $ts) < $ts THEN $ts ELSE coalesce(r.last_seen, $ts) END,
  r.event_count_30d = CASE WHEN ($ts - coalesce(r.window_start_30d, $ts)) > {window} THEN 1 ELSE coalesce(r.event_count_30d, 0) + 1 END,
  r.window_start_30d = CASE WHEN ($ts - coalesce(r.window_start_30d, $ts)) > {window} THEN $ts ELSE coalesce(r.window_start_30d, $ts) END,
  r.total_amount = coalesce(r.total_amount, 0.0) + $amount,
  r.max_amount = CASE WHEN $amount > coalesce(r.max_amount, 0.0) THEN $amount ELSE coalesce(r.max_amount, 0.0) END
RETURN r.event_count AS event_count, r.event_count_30d AS event_count_30d",
        label = target_type.label(),
        prop = target_type.key_property(),
        edge = edge_type.as_str(),
        window = WINDOW_30D_MS,
    );
    GraphQuery::new(QueryShape::UpsertAggregated, body)
        .token("label", target_type.label())
        .token("edge_type", edge_type.as_str())
        .param("user_id", user_id)
        .param("target_key", target_key)
        .param("ts", ts)
        .param("amount", amount)
}

/// (e) Create or refresh an operator-declared edge.
pub fn upsert_manual(
    from_type: NodeType,
    from_key: &str,
    to_type: NodeType,
    to_key: &str,
    edge_type: &Token,
    ts: i64,
) -> GraphQuery {
    let body = format!(
        "MERGE (a:{from_label} {{{from_prop}: $from_key}})
MERGE (b:{to_label} {{{to_prop}: $to_key}})
MERGE (a)-[r:{edge}]->(b)
ON CREATE SET r.created_at = $ts
SET r.manual = true, r.updated_at = $ts",
        from_label = from_type.label(),
        from_prop = from_type.key_property(),
        to_label = to_type.label(),
        to_prop = to_type.key_property(),
        edge = edge_type.as_str(),
    );
    GraphQuery::new(QueryShape::UpsertManual, body)
        .token("from_label", from_type.label())
        .token("to_label", to_type.label())
        .token("edge_type", edge_type.as_str())
        .param("from_key", from_key)
        .param("to_key", to_key)
        .param("ts", ts)
}

pub fn ping() -> GraphQuery {
    GraphQuery::new(QueryShape::Ping, "RETURN 1")
}

/// Relationship types present in the graph.
pub fn relationship_types() -> GraphQuery {
    GraphQuery::new(
        QueryShape::RelationshipTypes,
        "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType ORDER BY relationshipType",
    )
}

/// Exact-match index on a node type's key property.
pub fn create_index(node_type: NodeType) -> GraphQuery {
    GraphQuery::new(
        QueryShape::CreateIndex,
        format!("CREATE INDEX ON :{}({})", node_type.label(), node_type.key_property()),
    )
    .token("label", node_type.label())
}
