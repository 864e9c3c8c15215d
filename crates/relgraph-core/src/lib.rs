//! relgraph core library
//!
//! Data model, stable identifiers and input validation shared by the
//! store client, the graph services and the HTTP surface.

pub mod error;
pub mod ids;
pub mod model;
pub mod rank;
pub mod token;

pub use error::{ValidationError, ValidationResult};
pub use ids::{edge_id, node_id};
pub use model::edge::{EdgeStats, GraphEdge};
pub use model::event::{CustomerEvent, EventTimestamp, Target};
pub use model::node::{GraphNode, NodeRef, NodeType};
pub use model::request::{
    IngestResponse, Limit, ManualEdgeRequest, MetadataResponse, SubgraphRequest,
    SubgraphResponse, RESPONSE_VERSION,
};
pub use rank::RankMetric;
pub use token::{EventTypePolicy, Token, CURATED_EVENT_TYPES};
