// src/services/mod.rs

// One module per API concern, mirrored by the methods on `SelfClient`.
pub mod blocks;
pub mod faucet;
pub mod status;
pub mod transactions;
pub mod wallet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SdkError};

/// Error body the API uses for non-success replies.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Joins a base URL and a path segment without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> Result<T> {
    debug!("GET {}", url);
    let response = http.get(url).send().await?;
    decode(response).await
}

pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<T> {
    debug!("POST {}", url);
    let response = http.post(url).json(body).send().await?;
    decode(response).await
}

/// Turns non-2xx replies into `SdkError::Api`, decoding the API's
/// `{"error": ...}` body when it sends one.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });
        return Err(SdkError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(SdkError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("https://api.self.app/v1/", "status"),
            "https://api.self.app/v1/status"
        );
        assert_eq!(
            endpoint("https://api.self.app/v1", "blocks/latest"),
            "https://api.self.app/v1/blocks/latest"
        );
    }
}
