// src/services/status.rs

use reqwest::Client;
use tracing::info;

use crate::error::Result;
use crate::models::BlockchainStatus;
use crate::services::{endpoint, get_json};

/// Fetches the current network status.
pub async fn get_status(http: &Client, api_url: &str) -> Result<BlockchainStatus> {
    info!("Fetching blockchain status from {}", api_url);
    get_json(http, &endpoint(api_url, "status")).await
}
