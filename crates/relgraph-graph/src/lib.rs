//! # relgraph graph
//!
//! Graph operations on top of the store: bounded subgraph traversal,
//! aggregated edge ingestion, manual edges and metadata.

pub mod error;
pub mod ingest;
pub mod manual;
pub mod metadata;
pub mod service;
pub mod settings;
pub mod traversal;

#[cfg(test)]
mod fake;

pub use error::{GraphError, GraphResult};
pub use ingest::{BatchOutcome, IngestOutcome};
pub use service::GraphService;
pub use settings::GraphSettings;
pub use traversal::budget::{Budget, HopPlan};
