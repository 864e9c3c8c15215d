//! Subgraph command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use relgraph_core::{Limit, NodeRef, SubgraphRequest, SubgraphResponse};
use relgraph_graph::GraphService;

#[derive(Args, Debug)]
pub struct SubgraphArgs {
    /// Root user id
    pub user_id: String,

    /// Number of hops
    #[arg(long, default_value_t = 2)]
    pub hops: i64,

    /// Restrict to these edge types (repeatable)
    #[arg(long = "edge-type")]
    pub edge_types: Vec<String>,

    /// Minimum event count per edge
    #[arg(long)]
    pub min_event_count: Option<i64>,

    /// Only edges seen within this many milliseconds
    #[arg(long, default_value_t = 0)]
    pub time_window_ms: i64,

    #[arg(long, default_value_t = 0)]
    pub max_nodes: i64,

    #[arg(long, default_value_t = 0)]
    pub max_edges: i64,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

impl SubgraphArgs {
    fn request(&self) -> SubgraphRequest {
        SubgraphRequest {
            root: NodeRef::new("USER", self.user_id.clone()),
            hops: self.hops,
            edge_types: self.edge_types.clone(),
            min_event_count: self.min_event_count,
            time_window_ms: self.time_window_ms,
            limit: Limit {
                max_nodes: self.max_nodes,
                max_edges: self.max_edges,
            },
        }
    }
}

pub async fn execute(args: &SubgraphArgs, service: GraphService) -> Result<()> {
    let resp = service.subgraph(&args.request()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        print_subgraph(&resp);
    }
    Ok(())
}

fn print_subgraph(resp: &SubgraphResponse) {
    println!("{} {}", "Subgraph".cyan().bold(), resp.root.bold());
    println!();

    println!("{} ({})", "Nodes".bold(), resp.nodes.len());
    for node in &resp.nodes {
        println!("  {:<40} {}", node.id, node.label.dimmed());
    }
    println!();

    println!("{} ({})", "Edges".bold(), resp.edges.len());
    for edge in &resp.edges {
        let kind = if edge.manual {
            edge.edge_type.yellow()
        } else {
            edge.edge_type.normal()
        };
        let count = edge
            .stats
            .as_ref()
            .map(|s| format!("x{}", s.event_count))
            .unwrap_or_default();
        println!("  {} -[{}]-> {} {}", edge.from, kind, edge.to, count.dimmed());
    }

    if resp.truncated {
        println!();
        println!("{}", "Budget exhausted: result truncated".yellow());
    }
}
