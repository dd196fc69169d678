// src/services/blocks.rs

use reqwest::Client;
use tracing::info;

use crate::error::Result;
use crate::models::{Block, BlockId};
use crate::services::{endpoint, get_json};

/// Fetches a block by height, hash, or the chain tip.
pub async fn get_block(http: &Client, api_url: &str, id: &BlockId) -> Result<Block> {
    info!("Fetching block {}", id);
    get_json(http, &endpoint(api_url, &format!("blocks/{}", id))).await
}
