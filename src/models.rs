// src/models.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Chain Status Models ---

/// Current state of the network as reported by `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainStatus {
    /// Network name, e.g. "mainnet" or "testnet".
    pub network: String,
    /// Chain identifier, e.g. "self-testnet-001".
    pub chain_id: String,
    /// Height of the current chain tip.
    pub block_height: u64,
    /// Average block interval in seconds.
    pub block_time: f64,
    /// Number of active validators.
    pub validators: u32,
    /// Consensus mechanism, e.g. "Proof-of-AI (PoAI)".
    pub consensus_type: String,
    /// Node software version, when the endpoint reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// True while the queried node is still catching up.
    #[serde(default)]
    pub syncing: bool,
}

// --- Block Models ---

/// A block in the chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub height: u64,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Address of the validator that produced the block.
    pub validator: String,
    /// PoAI validation score assigned to the block, in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f64>,
    /// Hashes of the transactions included in the block.
    #[serde(default)]
    pub transactions: Vec<String>,
}

/// Identifies a block for [`get_block`](crate::SelfClient::get_block):
/// by height, by hash, or the chain tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Latest,
    Height(u64),
    Hash(String),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Latest => write!(f, "latest"),
            BlockId::Height(height) => write!(f, "{}", height),
            BlockId::Hash(hash) => write!(f, "{}", hash),
        }
    }
}

impl From<u64> for BlockId {
    fn from(height: u64) -> Self {
        BlockId::Height(height)
    }
}

impl From<&str> for BlockId {
    fn from(hash: &str) -> Self {
        BlockId::Hash(hash.to_string())
    }
}

impl From<String> for BlockId {
    fn from(hash: String) -> Self {
        BlockId::Hash(hash)
    }
}

// --- Transaction Models ---

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

/// A transaction as returned by the chain API.
///
/// Amounts are decimal strings; chain values must not be squeezed into a
/// lossy numeric type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    pub status: TransactionStatus,
    /// Height of the including block, absent while pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Request body for `POST /transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionOptions {
    pub to: String,
    pub amount: String,
    /// Sender address. Filled in automatically when signing locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Signature over the canonical request JSON, when signed locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl CreateTransactionOptions {
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            ..Self::default()
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

// --- Wallet Models ---

/// A generated or imported wallet.
#[derive(Debug, Serialize, Deserialize)]
pub struct Wallet {
    /// 0x-prefixed keccak address.
    pub address: String,
    /// Hex-encoded secp256k1 private key.
    pub private_key: String,
    /// Recovery phrase, present only for wallets created or imported from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

// --- Faucet Models ---

/// Reply from the testnet faucet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetResponse {
    pub tx_hash: String,
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_deserializes_from_camel_case() {
        let status: BlockchainStatus = serde_json::from_value(json!({
            "network": "testnet",
            "chainId": "self-testnet-001",
            "blockHeight": 123456,
            "blockTime": 2.1,
            "validators": 10,
            "consensusType": "Proof-of-AI (PoAI)"
        }))
        .unwrap();
        assert_eq!(status.chain_id, "self-testnet-001");
        assert_eq!(status.block_height, 123456);
        assert!(!status.syncing);
        assert!(status.version.is_none());
    }

    #[test]
    fn block_deserializes_with_optional_fields_missing() {
        let block: Block = serde_json::from_value(json!({
            "height": 42,
            "hash": "0xabc",
            "timestamp": "2026-01-01T00:00:00Z",
            "validator": "validator-001"
        }))
        .unwrap();
        assert_eq!(block.height, 42);
        assert!(block.parent_hash.is_none());
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn block_deserializes_ai_score() {
        let block: Block = serde_json::from_value(json!({
            "height": 7,
            "hash": "0xdef",
            "timestamp": "2026-01-01T00:00:00Z",
            "validator": "validator-002",
            "aiScore": 0.98,
            "transactions": ["0x1", "0x2"]
        }))
        .unwrap();
        assert_eq!(block.ai_score, Some(0.98));
        assert_eq!(block.transactions.len(), 2);
    }

    #[test]
    fn transaction_status_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_value(TransactionStatus::Pending).unwrap(),
            json!("pending")
        );
        let status: TransactionStatus = serde_json::from_value(json!("confirmed")).unwrap();
        assert_eq!(status, TransactionStatus::Confirmed);
    }

    #[test]
    fn block_id_renders_url_segments() {
        assert_eq!(BlockId::Latest.to_string(), "latest");
        assert_eq!(BlockId::from(99u64).to_string(), "99");
        assert_eq!(BlockId::from("0xbeef").to_string(), "0xbeef");
    }

    #[test]
    fn create_options_skip_unset_fields() {
        let options = CreateTransactionOptions::new("0xrecipient", "1000");
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value, json!({"to": "0xrecipient", "amount": "1000"}));
    }
}
