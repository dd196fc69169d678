// src/services/transactions.rs

use std::str::FromStr;

use ethers_signers::{LocalWallet, Signer};
use reqwest::Client;
use tracing::info;

use crate::error::{Result, SdkError};
use crate::models::{CreateTransactionOptions, Transaction};
use crate::services::{endpoint, get_json, post_json};

/// Submits a new transaction to the chain.
pub async fn create_transaction(
    http: &Client,
    api_url: &str,
    options: &CreateTransactionOptions,
) -> Result<Transaction> {
    info!("Submitting transaction to {}", options.to);
    post_json(http, &endpoint(api_url, "transactions"), options).await
}

/// Fetches a transaction by hash.
pub async fn get_transaction(http: &Client, api_url: &str, hash: &str) -> Result<Transaction> {
    info!("Fetching transaction {}", hash);
    get_json(http, &endpoint(api_url, &format!("transactions/{}", hash))).await
}

/// Signs a transaction request with the given private key.
///
/// The sender address is derived from the key and the signature is an
/// Ethereum personal-message signature over the canonical JSON of the
/// request with the signature field unset.
pub async fn sign_options(
    options: &CreateTransactionOptions,
    private_key: &str,
) -> Result<CreateTransactionOptions> {
    let wallet = LocalWallet::from_str(private_key)
        .map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;

    let mut signed = options.clone();
    signed.from = Some(format!("0x{}", hex::encode(wallet.address())));
    signed.signature = None;

    let payload = serde_json::to_string(&signed)?;
    let signature = wallet
        .sign_message(payload.as_bytes())
        .await
        .map_err(|e| SdkError::Wallet(e.to_string()))?;
    signed.signature = Some(format!("0x{}", signature));

    Ok(signed)
}
