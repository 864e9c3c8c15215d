//! FalkorDB client over a multiplexed Redis connection.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use thiserror::Error;
use tracing::{debug, warn};

use crate::compact::decode_compact;
use crate::store::{GraphQuery, GraphStore};
use crate::value::Row;

/// Store error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Graph query timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected graph response: {0}")]
    Decode(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Redis connection pool; `ConnectionManager` multiplexes internally and is
/// cloned per operation.
pub type RedisPool = ConnectionManager;

/// Initialize a Redis connection pool from a URL.
///
/// Example URL: `redis://127.0.0.1:6379`
pub async fn init_pool(redis_url: &str) -> StoreResult<RedisPool> {
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    Ok(manager)
}

/// Connection settings for [`FalkorStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub redis_url: String,
    pub graph_name: String,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            graph_name: "fraudnet".to_string(),
            timeout: Duration::from_millis(1500),
        }
    }
}

/// `GraphStore` backed by FalkorDB's `GRAPH.QUERY` command.
#[derive(Clone)]
pub struct FalkorStore {
    pool: RedisPool,
    graph_name: String,
    timeout: Duration,
}

impl FalkorStore {
    pub fn new(pool: RedisPool, graph_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            pool,
            graph_name: graph_name.into(),
            timeout,
        }
    }

    /// Open the pool and verify the store answers within the timeout.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let pool = tokio::time::timeout(config.timeout, init_pool(&config.redis_url))
            .await
            .map_err(|_| StoreError::Timeout(config.timeout))??;
        let store = Self::new(pool, config.graph_name.clone(), config.timeout);
        store.ping().await?;
        Ok(store)
    }

    pub fn graph_name(&self) -> &str {
        &self.graph_name
    }

    async fn raw_query(&self, text: &str) -> StoreResult<redis::Value> {
        let mut conn = self.pool.clone();
        let mut cmd = redis::cmd("GRAPH.QUERY");
        cmd.arg(&self.graph_name).arg(text).arg("--compact");

        let call = async move {
            let value: redis::Value = cmd.query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(value)
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl GraphStore for FalkorStore {
    async fn execute(&self, query: &GraphQuery) -> StoreResult<Vec<Row>> {
        let text = query.render();
        let started = Instant::now();
        debug!(graph = %self.graph_name, shape = query.shape().as_str(), query = %text, "graph query");

        let value = match self.raw_query(&text).await {
            Ok(value) => value,
            Err(e) => {
                warn!(graph = %self.graph_name, shape = query.shape().as_str(), error = %e, "graph query failed");
                return Err(e);
            }
        };

        let rows = decode_compact(&value)?;
        debug!(
            graph = %self.graph_name,
            shape = query.shape().as_str(),
            rows = rows.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "graph result"
        );
        Ok(rows)
    }
}
