// src/services/faucet.rs

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::models::FaucetResponse;
use crate::services::{endpoint, post_json};

#[derive(Debug, Serialize)]
struct FaucetRequest<'a> {
    address: &'a str,
}

/// Asks the testnet faucet to fund an address. The faucet enforces its own
/// daily limits and cooldowns.
pub async fn request_funds(
    http: &Client,
    faucet_url: &str,
    address: &str,
) -> Result<FaucetResponse> {
    info!("Requesting faucet funds for {}", address);
    post_json(http, &endpoint(faucet_url, "fund"), &FaucetRequest { address }).await
}
