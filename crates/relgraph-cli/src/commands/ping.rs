//! Ping command.

use std::time::Instant;

use anyhow::Result;
use colored::Colorize;

use super::StoreArgs;

pub async fn execute(store_args: &StoreArgs) -> Result<()> {
    let started = Instant::now();
    // connect() already issues a ping
    let store = store_args.connect().await?;
    println!(
        "{} {} ({}) answered in {} ms",
        "✓".green(),
        store_args.redis_url,
        store.graph_name(),
        started.elapsed().as_millis()
    );
    Ok(())
}
