//! Audit entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openwatch_core::types::{AuditEntryId, RecordId, UserId};

use super::action::AuditAction;

/// An immutable audit entry recording one record mutation.
///
/// Entries are append-only: nothing in the core updates or removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique, time-ordered entry identifier.
    pub id: AuditEntryId,
    /// The record the mutation targeted. A back-reference only.
    pub record_id: RecordId,
    /// What happened.
    pub action: AuditAction,
    /// The acting user.
    pub user_id: UserId,
    /// The acting user's display name at the time.
    pub user_name: String,
    /// The applied field set (CREATE/UPDATE). Absent for DELETE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<serde_json::Value>,
    /// Full snapshot before the mutation (UPDATE/DELETE). Absent for CREATE.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_data: Option<serde_json::Value>,
    /// Assigned at insertion; non-decreasing across entries.
    pub timestamp: DateTime<Utc>,
    /// Client address, or a placeholder.
    pub ip_address: String,
    /// Client user agent, or a placeholder.
    pub user_agent: String,
}

/// Data required to append a new audit entry.
///
/// The ledger assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuditEntry {
    /// Target record.
    pub record_id: RecordId,
    /// What happened.
    pub action: AuditAction,
    /// The acting user.
    pub user_id: UserId,
    /// The acting user's display name.
    pub user_name: String,
    /// Applied field set.
    pub changes: Option<serde_json::Value>,
    /// Pre-mutation snapshot.
    pub previous_data: Option<serde_json::Value>,
    /// Client address.
    pub ip_address: String,
    /// Client user agent.
    pub user_agent: String,
}

impl CreateAuditEntry {
    /// Materialize the entry with ledger-assigned identity and time.
    pub fn into_entry(self, id: AuditEntryId, timestamp: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            record_id: self.record_id,
            action: self.action,
            user_id: self.user_id,
            user_name: self.user_name,
            changes: self.changes,
            previous_data: self.previous_data,
            timestamp,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
        }
    }
}
