//! Error type for graph operations.

use relgraph_core::ValidationError;
use relgraph_store::StoreError;
use thiserror::Error;

/// Failure of a graph operation.
///
/// Budget exhaustion is not an error: a truncated traversal still succeeds.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Store(StoreError::Timeout(_)))
    }
}
