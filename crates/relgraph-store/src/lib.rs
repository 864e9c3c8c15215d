//! # relgraph store
//!
//! FalkorDB access for relgraph: the `GraphStore` seam, the Redis-backed
//! client, Cypher query templates with parameter binding, and decoding of
//! the compact `GRAPH.QUERY` reply format.

pub mod client;
pub mod compact;
pub mod cypher;
pub mod params;
pub mod schema;
pub mod store;
pub mod value;

pub use client::{FalkorStore, RedisPool, StoreConfig, StoreError, StoreResult, init_pool};
pub use params::{ParamValue, Params};
pub use store::{GraphQuery, GraphStore, QueryShape};
pub use value::{CoercionError, GraphValue, Row};
