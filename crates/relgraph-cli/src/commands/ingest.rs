//! Ingest command: replay events from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use relgraph_core::CustomerEvent;
use relgraph_graph::GraphService;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// File holding a JSON array of events
    pub file: PathBuf,
}

fn read_events(path: &Path) -> Result<Vec<CustomerEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid event array in {}", path.display()))
}

pub async fn execute(args: &IngestArgs, service: GraphService) -> Result<()> {
    let events = read_events(&args.file)?;
    let outcome = service.ingest_batch(&events).await;
    let resp = outcome.response;

    match outcome.error {
        None => {
            println!("{} {} events applied", "✓".green(), resp.accepted_count);
            Ok(())
        }
        Some(e) => {
            println!(
                "{} {} applied, stopped at event {}",
                "✗".red(),
                resp.accepted_count,
                resp.failed_index.unwrap_or(resp.accepted_count)
            );
            bail!(e)
        }
    }
}
