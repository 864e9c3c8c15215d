//! The graph store seam.

use async_trait::async_trait;

use crate::client::StoreResult;
use crate::cypher;
use crate::params::{ParamValue, Params};
use crate::value::Row;

/// Which template a query was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    Ping,
    UserToEntity,
    EntityToUser,
    EntityInternalId,
    UpsertAggregated,
    UpsertManual,
    RelationshipTypes,
    CreateIndex,
}

impl QueryShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::UserToEntity => "user_to_entity",
            Self::EntityToUser => "entity_to_user",
            Self::EntityInternalId => "entity_internal_id",
            Self::UpsertAggregated => "upsert_aggregated",
            Self::UpsertManual => "upsert_manual",
            Self::RelationshipTypes => "relationship_types",
            Self::CreateIndex => "create_index",
        }
    }
}

/// A query body plus its bound parameters.
///
/// Identifier tokens substituted into the body are recorded alongside so
/// callers and logs can see exactly what reached the query text.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQuery {
    shape: QueryShape,
    body: String,
    params: Params,
    tokens: Vec<(&'static str, String)>,
}

impl GraphQuery {
    pub fn new(shape: QueryShape, body: impl Into<String>) -> Self {
        Self {
            shape,
            body: body.into(),
            params: Params::new(),
            tokens: Vec::new(),
        }
    }

    /// Bind a value parameter referenced as `$name` in the body.
    pub fn param(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.params.set(name, value);
        self
    }

    /// Record an identifier that was interpolated into the body.
    pub(crate) fn token(mut self, name: &'static str, value: &str) -> Self {
        self.tokens.push((name, value.to_string()));
        self
    }

    pub fn shape(&self) -> QueryShape {
        self.shape
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn get_token(&self, name: &str) -> Option<&str> {
        self.tokens.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    /// Full text sent to the store: parameter header followed by the body.
    pub fn render(&self) -> String {
        let mut text = self.params.header();
        text.push_str(&self.body);
        text
    }
}

/// Executes queries against the external graph store.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run `query` and return its rows. Mutations without a `RETURN` yield no rows.
    async fn execute(&self, query: &GraphQuery) -> StoreResult<Vec<Row>>;

    /// Trivial liveness query.
    async fn ping(&self) -> StoreResult<()> {
        self.execute(&cypher::ping()).await.map(|_| ())
    }
}
