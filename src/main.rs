use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ynab_memo::config::{Command, Config};
use ynab_memo::{fetch_orders_with, order_memo, ExportSession};

fn main() -> Result<()> {
    init_logging();
    let config = Config::parse();

    let session = ExportSession::open(&config.export)?;
    let orders = fetch_orders_with(&session, config.fallback_policy())
        .context("Failed to normalize order history")?;

    let duplicates = orders.duplicate_ids();
    if !duplicates.is_empty() {
        info!(?duplicates, "order ids appear more than once");
    }

    match config.command() {
        Command::Orders => {
            for order in &orders {
                println!("{}  {}  {}", order.record_date, order.id, order.total);
                println!("{}\n", order_memo(order, config.format));
            }
        }
        Command::Json => {
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
    }

    info!(orders = orders.len(), "done");
    Ok(())
}

/// Logs go to stderr so stdout stays clean for memo/json output
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
