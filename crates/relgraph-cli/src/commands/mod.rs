//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use relgraph_core::RankMetric;
use relgraph_graph::{GraphService, GraphSettings};
use relgraph_graph::settings::{DEFAULT_MAX_EDGES, DEFAULT_MAX_NODES, DEFAULT_MIN_EVENT_COUNT};
use relgraph_store::{FalkorStore, StoreConfig};

pub mod ingest;
pub mod ping;
pub mod schema;
pub mod serve;
pub mod subgraph;

/// Relationship graph for fraud analytics, backed by FalkorDB
#[derive(Parser)]
#[command(name = "relgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub graph: GraphArgs,

    /// Also append logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve(serve::ServeArgs),

    /// Create key-property indexes for every node type
    Schema,

    /// Check that the graph store answers
    Ping,

    /// Print the bounded neighbourhood of a user
    Subgraph(subgraph::SubgraphArgs),

    /// Ingest a JSON array of customer events from a file
    Ingest(ingest::IngestArgs),
}

/// Graph store connection.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Redis URL of the FalkorDB server
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379", global = true)]
    pub redis_url: String,

    /// Graph key
    #[arg(long, env = "GRAPH_NAME", default_value = "fraudnet", global = true)]
    pub graph_name: String,

    /// Per-query timeout in milliseconds
    #[arg(long, env = "DB_TIMEOUT_MS", default_value_t = 1500, global = true)]
    pub db_timeout_ms: u64,
}

impl StoreArgs {
    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            redis_url: self.redis_url.clone(),
            graph_name: self.graph_name.clone(),
            timeout: Duration::from_millis(self.db_timeout_ms.max(1)),
        }
    }

    pub async fn connect(&self) -> Result<FalkorStore> {
        FalkorStore::connect(&self.config())
            .await
            .with_context(|| format!("Failed to connect to graph store at {}", self.redis_url))
    }
}

/// Request defaults and validation mode.
#[derive(Args, Debug, Clone)]
pub struct GraphArgs {
    /// Node budget when a request omits one
    #[arg(long, env = "DEFAULT_MAX_NODES", default_value_t = DEFAULT_MAX_NODES, global = true)]
    pub default_max_nodes: i64,

    /// Edge budget when a request omits one
    #[arg(long, env = "DEFAULT_MAX_EDGES", default_value_t = DEFAULT_MAX_EDGES, global = true)]
    pub default_max_edges: i64,

    /// Minimum edge event count when a request omits one
    #[arg(long, env = "DEFAULT_MIN_EVENT_COUNT", default_value_t = DEFAULT_MIN_EVENT_COUNT, global = true)]
    pub default_min_event_count: i64,

    /// Edge property used to rank neighbours (event_count_30d, event_count, total_amount)
    #[arg(long, env = "DEFAULT_RANK_BY", default_value = "event_count_30d", global = true)]
    pub default_rank_by: String,

    /// Curated event types only, and at most 3 hops
    #[arg(long, env = "RELGRAPH_STRICT", global = true)]
    pub strict: bool,
}

impl GraphArgs {
    pub fn settings(&self) -> GraphSettings {
        GraphSettings::new(
            self.default_max_nodes,
            self.default_max_edges,
            self.default_min_event_count,
            RankMetric::from_str_or_default(&self.default_rank_by),
            self.strict,
        )
    }
}

impl Cli {
    /// Connect and wrap the store in a service.
    async fn service(&self) -> Result<GraphService> {
        let store = self.store.connect().await?;
        Ok(GraphService::new(Arc::new(store), self.graph.settings()))
    }

    pub async fn execute(self) -> Result<()> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self).await,
            Commands::Schema => schema::execute(&self.store).await,
            Commands::Ping => ping::execute(&self.store).await,
            Commands::Subgraph(args) => subgraph::execute(args, self.service().await?).await,
            Commands::Ingest(args) => ingest::execute(args, self.service().await?).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::EventTypePolicy;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["relgraph", "ping"]).unwrap();
        assert_eq!(cli.store.graph_name, "fraudnet");
        assert_eq!(cli.store.config().timeout, Duration::from_millis(1500));

        let settings = cli.graph.settings();
        assert_eq!(settings.default_max_nodes, 200);
        assert_eq!(settings.default_max_edges, 400);
        assert_eq!(settings.rank, RankMetric::EventCount30d);
        assert_eq!(settings.event_type_policy, EventTypePolicy::Dynamic);
    }

    #[test]
    fn test_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "relgraph",
            "serve",
            "--port",
            "9000",
            "--strict",
            "--default-rank-by",
            "total_amount",
            "--default-max-edges",
            "0",
        ])
        .unwrap();
        let settings = cli.graph.settings();
        assert_eq!(settings.rank, RankMetric::TotalAmount);
        assert_eq!(settings.max_hops, Some(3));
        assert_eq!(settings.default_max_edges, 400);
        assert!(matches!(cli.command, Commands::Serve(ref args) if args.port == 9000));
    }
}
