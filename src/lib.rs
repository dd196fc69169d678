// src/lib.rs

//! Rust SDK for SELF Chain.
//!
//! [`SelfClient`] is the entry point: it wraps the chain's HTTP API and,
//! when enabled, a websocket connection for real-time block and transaction
//! updates.
//!
//! ```no_run
//! use self_sdk::{ClientConfig, SelfClient};
//!
//! # async fn run() -> self_sdk::Result<()> {
//! let client = SelfClient::connect(ClientConfig::testnet()).await?;
//! let status = client.get_status().await?;
//! println!("chain {} at height {}", status.chain_id, status.block_height);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod ws;

pub use client::SelfClient;
pub use config::ClientConfig;
pub use error::{Result, SdkError};
pub use models::{Block, BlockchainStatus, Transaction};
pub use ws::{Channel, Subscription};

/// SDK version; always matches the crate version in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
