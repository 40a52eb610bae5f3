use anyhow::Context;
use cashfree_node::{CashfreeNode, NodeConfig};
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding an array of items (or a single item). Reads stdin when omitted or `-`.
    items: Option<PathBuf>,

    /// Record failed items as `{"error": ...}` instead of aborting the batch
    #[arg(long)]
    continue_on_fail: bool,
}

impl Cli {
    fn read_items(&self) -> anyhow::Result<Vec<Value>> {
        let raw = match &self.items {
            Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read items from {}", path.display()))?,
            _ => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read items from stdin")?;
                buffer
            }
        };

        parse_items(&raw)
    }
}

/// A single object is treated as a one-item batch.
fn parse_items(raw: &str) -> anyhow::Result<Vec<Value>> {
    match serde_json::from_str::<Value>(raw).context("Items are not valid JSON")? {
        Value::Array(items) => Ok(items),
        item => Ok(vec![item]),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    service_core::observability::init_tracing(&config.service_name, &config.log_level);

    let items = cli.read_items()?;

    let node = CashfreeNode::new(config)?;
    tracing::info!(
        items = items.len(),
        continue_on_fail = cli.continue_on_fail,
        "Executing batch"
    );

    let results = node.execute(&items, cli.continue_on_fail).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}
