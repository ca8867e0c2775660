//! Tamper-evidence digest attached to a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the hash function used for record fingerprints.
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Outcome of an attempt to externalize a digest.
///
/// An anchor failure is never an operation failure; it is recorded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorReceipt {
    /// Whether the external ledger accepted the digest.
    pub anchored: bool,
    /// Ledger-side reference (transaction hash or similar).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_ref: Option<String>,
    /// Why anchoring failed, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Informational note, e.g. when no anchor is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AnchorReceipt {
    /// The ledger accepted the digest.
    pub fn anchored(anchor_ref: impl Into<String>) -> Self {
        Self {
            anchored: true,
            anchor_ref: Some(anchor_ref.into()),
            error: None,
            note: None,
        }
    }

    /// The ledger was reachable in principle but the write did not land.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            anchored: false,
            anchor_ref: None,
            error: Some(error.into()),
            note: None,
        }
    }

    /// Nothing was attempted.
    pub fn skipped(note: impl Into<String>) -> Self {
        Self {
            anchored: false,
            anchor_ref: None,
            error: None,
            note: Some(note.into()),
        }
    }
}

/// A deterministic digest of a record's semantic fields plus its anchor receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityDigest {
    /// Hash function name.
    pub algorithm: String,
    /// Lowercase hex digest.
    pub hash: String,
    /// When the digest was computed.
    pub computed_at: DateTime<Utc>,
    /// Result of externalizing the digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<AnchorReceipt>,
}

impl IntegrityDigest {
    /// Create a digest without a receipt.
    pub fn new(hash: impl Into<String>, computed_at: DateTime<Utc>) -> Self {
        Self {
            algorithm: DIGEST_ALGORITHM.to_string(),
            hash: hash.into(),
            computed_at,
            receipt: None,
        }
    }

    /// Attach an anchor receipt.
    pub fn with_receipt(mut self, receipt: AnchorReceipt) -> Self {
        self.receipt = Some(receipt);
        self
    }

    /// Whether the digest was accepted by an external ledger.
    pub fn is_anchored(&self) -> bool {
        self.receipt.as_ref().is_some_and(|r| r.anchored)
    }
}
