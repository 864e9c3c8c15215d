//! Schema command.

use anyhow::Result;
use colored::Colorize;
use relgraph_core::NodeType;
use relgraph_store::schema::ensure_schema;

use super::StoreArgs;

pub async fn execute(store_args: &StoreArgs) -> Result<()> {
    let store = store_args.connect().await?;
    let created = ensure_schema(&store).await;
    let total = NodeType::ALL.len();

    if created == total {
        println!("{} {} indexes on graph '{}'", "✓".green(), created, store.graph_name());
    } else {
        println!(
            "{} {}/{} index statements applied on graph '{}' (see log for skipped ones)",
            "!".yellow(),
            created,
            total,
            store.graph_name()
        );
    }
    Ok(())
}
