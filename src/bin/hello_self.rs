//! Hello SELF: connect to the chain, print network info and the latest block.
//!
//! Endpoints and the API key come from the environment (`SELF_API_URL`,
//! `SELF_API_KEY`, ...) or a `.env` file; unset values fall back to mainnet.

use anyhow::{Context, Result};
use self_sdk::{ClientConfig, SelfClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "self_sdk=info".into());

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ClientConfig::from_env()?;
    let client = SelfClient::connect(config)
        .await
        .context("Failed to connect to SELF Chain")?;

    let status = client.get_status().await?;
    println!("📊 Network Information:");
    println!("• Network: {}", status.network);
    println!("• Chain ID: {}", status.chain_id);
    println!("• Consensus: {}", status.consensus_type);
    println!("• Block Height: {}", status.block_height);
    println!("• Block Time: {}s", status.block_time);
    println!("• Active Validators: {}", status.validators);

    if status.network != "mainnet" {
        println!("\n⚠️  Testnet tokens have no value and the network may be reset at any time.");
    }

    let block = client.get_latest_block().await?;
    println!("\n📦 Latest Block:");
    println!("• Height: {}", block.height);
    println!("• Hash: {}", block.hash);
    println!("• Validator: {}", block.validator);
    println!("• Transactions: {}", block.transactions.len());
    if let Some(score) = block.ai_score {
        println!("• AI Validation Score: {}", score);
    }
    println!("• Timestamp: {}", block.timestamp.to_rfc3339());

    Ok(())
}
