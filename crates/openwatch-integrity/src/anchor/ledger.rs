//! HTTP ledger gateway anchor.
//!
//! Talks to a gateway that fronts the external ledger:
//!
//! - `POST {endpoint}/anchors` with `{contract, recordId, digest}` returns `{txRef}`
//! - `GET {endpoint}/anchors/{contract}/{recordId}` returns `{digest}` or 404

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use openwatch_core::config::AnchorConfig;
use openwatch_core::error::{AppError, ErrorKind};
use openwatch_core::result::AppResult;
use openwatch_core::types::RecordId;
use openwatch_entity::integrity::AnchorReceipt;

use super::IntegrityAnchor;

/// Gateway failure modes.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Network, DNS, TLS or timeout failure.
    #[error("Ledger request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The gateway answered with a non-success status.
    #[error("Ledger gateway returned HTTP {0}")]
    HttpStatus(u16),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::with_source(ErrorKind::Anchor, err.to_string(), err)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnchorRequest<'a> {
    contract: &'a str,
    record_id: RecordId,
    digest: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnchorResponse {
    tx_ref: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    digest: Option<String>,
}

/// Anchors digests through an HTTP ledger gateway.
#[derive(Debug, Clone)]
pub struct LedgerAnchor {
    client: reqwest::Client,
    endpoint: String,
    credential: String,
    contract: String,
}

impl LedgerAnchor {
    /// Build from fully populated settings.
    pub fn from_config(config: &AnchorConfig) -> AppResult<Self> {
        let (Some(endpoint), Some(credential), Some(contract)) = (
            config.endpoint.as_deref(),
            config.credential.as_deref(),
            config.contract_address.as_deref(),
        ) else {
            return Err(AppError::configuration(
                "anchor.endpoint, anchor.credential and anchor.contract_address are all required",
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build ledger HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credential: credential.to_string(),
            contract: contract.to_string(),
        })
    }

    /// Gateway base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn submit(&self, record_id: RecordId, digest: &str) -> Result<String, LedgerError> {
        let body = AnchorRequest {
            contract: &self.contract,
            record_id,
            digest: format!("0x{digest}"),
        };
        let response = self
            .client
            .post(format!("{}/anchors", self.endpoint))
            .bearer_auth(&self.credential)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LedgerError::HttpStatus(response.status().as_u16()));
        }
        let receipt: AnchorResponse = response.json().await?;
        Ok(receipt.tx_ref)
    }

    async fn lookup(&self, record_id: RecordId) -> Result<Option<String>, LedgerError> {
        let response = self
            .client
            .get(format!(
                "{}/anchors/{}/{}",
                self.endpoint, self.contract, record_id
            ))
            .bearer_auth(&self.credential)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(LedgerError::HttpStatus(response.status().as_u16()));
        }
        let body: LookupResponse = response.json().await?;
        Ok(body.digest.filter(|d| !is_zero_digest(d)))
    }
}

/// The ledger reports unset slots as an all-zero word.
fn is_zero_digest(digest: &str) -> bool {
    let hex = digest.strip_prefix("0x").unwrap_or(digest);
    hex.is_empty() || hex.chars().all(|c| c == '0')
}

#[async_trait]
impl IntegrityAnchor for LedgerAnchor {
    fn name(&self) -> &'static str {
        "ledger"
    }

    async fn anchor(&self, record_id: RecordId, digest: &str) -> AnchorReceipt {
        match self.submit(record_id, digest).await {
            Ok(tx_ref) => {
                info!(record_id = %record_id, tx_ref = %tx_ref, "Digest anchored");
                AnchorReceipt::anchored(tx_ref)
            }
            Err(e) => {
                warn!(
                    record_id = %record_id,
                    error = %e,
                    "Anchoring failed, using local hash only"
                );
                AnchorReceipt::failed(e.to_string())
            }
        }
    }

    async fn fetch(&self, record_id: RecordId) -> AppResult<Option<String>> {
        Ok(self.lookup(record_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> LedgerAnchor {
        LedgerAnchor::from_config(&AnchorConfig {
            endpoint: Some("http://127.0.0.1:1/".into()),
            credential: Some("secret".into()),
            contract_address: Some("0xfeed".into()),
            timeout_ms: 500,
        })
        .unwrap()
    }

    #[test]
    fn test_from_config_requires_every_setting() {
        let err = LedgerAnchor::from_config(&AnchorConfig::default()).expect_err("incomplete");
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        assert_eq!(unreachable().endpoint(), "http://127.0.0.1:1");
    }

    #[test]
    fn test_zero_digest_is_unset() {
        assert!(is_zero_digest("0x0000000000000000"));
        assert!(is_zero_digest(""));
        assert!(!is_zero_digest("0x00ab"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_degrades_to_receipt_error() {
        let receipt = unreachable().anchor(RecordId::new(), "abcd").await;
        assert!(!receipt.anchored);
        assert!(receipt.anchor_ref.is_none());
        assert!(receipt.error.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_fails_lookup_and_verify() {
        let anchor = unreachable();
        let err = anchor.fetch(RecordId::new()).await.expect_err("unreachable");
        assert_eq!(err.kind, ErrorKind::Anchor);
        assert!(!anchor.verify(RecordId::new(), "abcd").await);
    }
}
