// src/error.rs

use thiserror::Error;

/// Result alias used across the SDK.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors surfaced by the SDK.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// Non-success reply from the chain API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("websocket error: {0}")]
    WebSocket(String),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("wallet error: {0}")]
    Wallet(String),
}
