// src/config.rs

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SdkError};

/// Mainnet API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.self.app/v1";
/// Mainnet websocket endpoint.
pub const DEFAULT_WS_URL: &str = "wss://ws.self.app/v1";
/// Testnet faucet endpoint.
pub const DEFAULT_FAUCET_URL: &str = "https://faucet.testnet.self.app";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`SelfClient`](crate::SelfClient).
///
/// `Clone` is required because the client hands a copy to the websocket
/// driver task. `Deserialize` lets applications embed the config in their
/// own TOML/JSON configuration files.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chain HTTP API.
    pub api_url: String,
    /// Websocket endpoint for live subscriptions.
    pub ws_url: String,
    /// Faucet endpoint used by [`request_faucet_tokens`](crate::SelfClient::request_faucet_tokens).
    pub faucet_url: String,
    /// API key sent as the `X-API-Key` header and in the websocket auth frame.
    pub api_key: Option<String>,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    /// Whether to start the websocket driver on client creation.
    pub enable_websocket: bool,
    /// Whether the websocket driver reconnects after a dropped connection.
    pub auto_reconnect: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            faucet_url: DEFAULT_FAUCET_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            enable_websocket: false,
            auto_reconnect: true,
        }
    }
}

impl ClientConfig {
    /// Settings for the public testnet. Testnet tokens have no value and the
    /// network may be reset at any time.
    pub fn testnet() -> Self {
        Self {
            api_url: "https://testnet-api.self.app/v1".to_string(),
            ws_url: "wss://testnet-ws.self.app/v1".to_string(),
            ..Self::default()
        }
    }

    /// Loads configuration from environment variables, reading a `.env` file
    /// first if one is present. Unset variables fall back to the mainnet
    /// defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let timeout = match env::var("SELF_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(raw.parse().map_err(|e| {
                SdkError::Config(format!("SELF_TIMEOUT_MS must be a valid number: {}", e))
            })?),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            api_url: env::var("SELF_API_URL").unwrap_or(defaults.api_url),
            ws_url: env::var("SELF_WS_URL").unwrap_or(defaults.ws_url),
            faucet_url: env::var("SELF_FAUCET_URL").unwrap_or(defaults.faucet_url),
            api_key: env::var("SELF_API_KEY").ok(),
            timeout,
            enable_websocket: env_flag("SELF_ENABLE_WEBSOCKET", defaults.enable_websocket)?,
            auto_reconnect: env_flag("SELF_AUTO_RECONNECT", defaults.auto_reconnect)?,
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = ws_url.into();
        self
    }

    pub fn with_faucet_url(mut self, faucet_url: impl Into<String>) -> Self {
        self.faucet_url = faucet_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_websocket(mut self, enable: bool) -> Self {
        self.enable_websocket = enable;
        self
    }

    pub fn with_auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.auto_reconnect = auto_reconnect;
        self
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(SdkError::Config(format!(
                "{} must be a boolean, got '{}'",
                name, other
            ))),
        },
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_mainnet() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
        assert!(!config.enable_websocket);
        assert!(config.auto_reconnect);
    }

    #[test]
    fn testnet_preset_overrides_endpoints() {
        let config = ClientConfig::testnet();
        assert_eq!(config.api_url, "https://testnet-api.self.app/v1");
        assert_eq!(config.ws_url, "wss://testnet-ws.self.app/v1");
        assert_eq!(config.faucet_url, DEFAULT_FAUCET_URL);
    }

    #[test]
    fn builder_methods_chain() {
        let config = ClientConfig::default()
            .with_api_url("http://localhost:3000")
            .with_api_key("secret")
            .with_websocket(true)
            .with_auto_reconnect(false);
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert!(config.enable_websocket);
        assert!(!config.auto_reconnect);
    }

    #[test]
    fn env_flag_rejects_garbage() {
        std::env::set_var("SELF_TEST_FLAG", "maybe");
        let err = env_flag("SELF_TEST_FLAG", false).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
        std::env::remove_var("SELF_TEST_FLAG");
    }
}
