//! Web server command.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use relgraph_graph::GraphService;
use relgraph_store::schema::ensure_schema;

use super::Cli;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "HTTP_PORT", default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HTTP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Skip index creation at start-up
    #[arg(long)]
    pub skip_schema: bool,
}

pub async fn execute(args: &ServeArgs, cli: &Cli) -> Result<()> {
    let store = Arc::new(cli.store.connect().await?);
    if !args.skip_schema {
        ensure_schema(store.as_ref()).await;
    }
    let settings = cli.graph.settings();

    println!();
    println!("  {} {}", "relgraph".cyan().bold(), "API Server".bold());
    println!();
    println!(
        "  {}     {} @ {}",
        "Graph".green(),
        store.graph_name(),
        cli.store.redis_url
    );
    println!(
        "  {}       http://{}:{}/v1",
        "API".green(),
        args.host,
        args.port
    );
    println!(
        "  {}    http://{}:{}/healthz",
        "Health".green(),
        args.host,
        args.port
    );
    if settings.max_hops.is_some() {
        println!("  {}", "Strict mode".yellow());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let service = GraphService::new(store, settings);
    relgraph_web::run_server(service, &args.host, args.port).await?;

    Ok(())
}
