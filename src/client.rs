// src/client.rs

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client as ReqwestClient;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{Result, SdkError};
use crate::models::{
    Block, BlockId, BlockchainStatus, CreateTransactionOptions, FaucetResponse, Transaction,
    Wallet,
};
use crate::services::{blocks, faucet, status, transactions, wallet};
use crate::ws::{self, Channel, Subscription, WsHandle};

// --- SelfClient Implementation ---

/// Client facade for SELF Chain.
///
/// Owns the HTTP connection and, when enabled in [`ClientConfig`], a
/// background websocket driver for live subscriptions. Cloning is cheap and
/// clones share both connections.
#[derive(Clone)]
pub struct SelfClient {
    http: ReqwestClient,
    config: ClientConfig,
    ws: Option<WsHandle>,
}

impl SelfClient {
    /// Creates a client from the given configuration.
    ///
    /// When `enable_websocket` is set this spawns the websocket driver and
    /// must therefore run inside a tokio runtime.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| SdkError::Config(format!("invalid API key: {}", e)))?;
            headers.insert("x-api-key", value);
        }

        let http = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let ws = config.enable_websocket.then(|| {
            ws::spawn(
                config.ws_url.clone(),
                config.api_key.clone(),
                config.auto_reconnect,
            )
        });

        Ok(Self { http, config, ws })
    }

    /// Creates a client and verifies the endpoint by fetching the chain
    /// status, so a bad URL or key fails here rather than on first use.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        let status = client.get_status().await?;
        info!(
            "Connected to {} (chain {}) at height {}",
            status.network, status.chain_id, status.block_height
        );
        Ok(client)
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the current blockchain status.
    pub async fn get_status(&self) -> Result<BlockchainStatus> {
        status::get_status(&self.http, &self.config.api_url).await
    }

    /// Fetches a block by height or hash.
    pub async fn get_block(&self, id: impl Into<BlockId>) -> Result<Block> {
        blocks::get_block(&self.http, &self.config.api_url, &id.into()).await
    }

    /// Fetches the block at the chain tip.
    pub async fn get_latest_block(&self) -> Result<Block> {
        blocks::get_block(&self.http, &self.config.api_url, &BlockId::Latest).await
    }

    /// Fetches a transaction by hash.
    pub async fn get_transaction(&self, hash: &str) -> Result<Transaction> {
        transactions::get_transaction(&self.http, &self.config.api_url, hash).await
    }

    /// Submits a new transaction. The request is authenticated by the API
    /// key; use [`create_signed_transaction`](Self::create_signed_transaction)
    /// to sign locally instead.
    pub async fn create_transaction(
        &self,
        options: &CreateTransactionOptions,
    ) -> Result<Transaction> {
        transactions::create_transaction(&self.http, &self.config.api_url, options).await
    }

    /// Signs a transaction request with the given private key, then submits
    /// it. The sender address is derived from the key.
    pub async fn create_signed_transaction(
        &self,
        options: &CreateTransactionOptions,
        private_key: &str,
    ) -> Result<Transaction> {
        let signed = transactions::sign_options(options, private_key).await?;
        transactions::create_transaction(&self.http, &self.config.api_url, &signed).await
    }

    /// Generates a new wallet with a fresh recovery phrase.
    pub fn create_wallet(&self) -> Result<Wallet> {
        wallet::create_wallet()
    }

    /// Imports an existing wallet from a recovery phrase or private key.
    pub fn import_wallet(&self, input: &str) -> Result<Wallet> {
        wallet::import_wallet(input)
    }

    /// Requests testnet funds for an address from the configured faucet.
    pub async fn request_faucet_tokens(&self, address: &str) -> Result<FaucetResponse> {
        faucet::request_funds(&self.http, &self.config.faucet_url, address).await
    }

    /// Subscribes to new blocks as they are produced.
    pub fn subscribe_blocks(&self) -> Result<Subscription<Block>> {
        Ok(self.ws_handle()?.subscribe(Channel::Blocks))
    }

    /// Subscribes to transactions as they are observed by the node.
    pub fn subscribe_transactions(&self) -> Result<Subscription<Transaction>> {
        Ok(self.ws_handle()?.subscribe(Channel::Transactions))
    }

    /// Closes the websocket connection. Open subscriptions stop yielding
    /// events; HTTP operations keep working.
    pub fn close(&self) {
        if let Some(ws) = &self.ws {
            ws.shutdown();
        }
    }

    fn ws_handle(&self) -> Result<&WsHandle> {
        self.ws.as_ref().ok_or_else(|| {
            SdkError::WebSocket(
                "websocket support is disabled; set enable_websocket in ClientConfig".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_without_websocket() {
        let client = SelfClient::new(ClientConfig::default()).unwrap();
        assert!(client.ws.is_none());
        assert_eq!(client.config().api_url, crate::config::DEFAULT_API_URL);
    }

    #[test]
    fn subscriptions_require_websocket() {
        let client = SelfClient::new(ClientConfig::default()).unwrap();
        assert!(matches!(
            client.subscribe_blocks().map(|_| ()),
            Err(SdkError::WebSocket(_))
        ));
    }

    #[test]
    fn rejects_unprintable_api_key() {
        let config = ClientConfig::default().with_api_key("bad\nkey");
        assert!(matches!(
            SelfClient::new(config).map(|_| ()),
            Err(SdkError::Config(_))
        ));
    }
}
