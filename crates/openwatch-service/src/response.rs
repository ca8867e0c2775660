//! Outcome envelopes returned by the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openwatch_core::types::{OperationWarning, RecordId};
use openwatch_entity::audit::AuditEntry;
use openwatch_entity::record::Record;

/// A single record plus any non-fatal warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    /// Always `true`; failures are returned as errors.
    pub success: bool,
    /// The record as stored after the operation.
    pub record: Record,
    /// Problems that did not undo the operation, e.g. a failed audit append.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<OperationWarning>,
}

impl RecordResponse {
    /// Successful outcome.
    pub fn new(record: Record, warnings: Vec<OperationWarning>) -> Self {
        Self {
            success: true,
            record,
            warnings,
        }
    }

    /// Whether the mutation committed without a matching audit entry.
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of a deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// The removed record.
    pub record_id: RecordId,
    /// Human-readable confirmation.
    pub message: String,
    /// Non-fatal problems.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<OperationWarning>,
}

/// Every audit entry for one record, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrailResponse {
    /// Always `true`.
    pub success: bool,
    /// The record the trail belongs to.
    pub record_id: RecordId,
    /// The entries.
    pub audit_trail: Vec<AuditEntry>,
}

/// Out-of-band integrity check of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// The checked record.
    pub record_id: RecordId,
    /// Fingerprint of the record as it is stored now.
    pub current_hash: String,
    /// Digest captured when the record was sealed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_hash: Option<String>,
    /// Whether the current fingerprint equals the stored digest.
    pub local_match: bool,
    /// Whether the external ledger holds the stored digest.
    ///
    /// `None` when no anchor is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchored_match: Option<bool>,
    /// When the check ran.
    pub verified_at: DateTime<Utc>,
}
