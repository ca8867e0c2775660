//! Audit query filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use openwatch_core::types::UserId;

use super::action::AuditAction;
use super::model::AuditEntry;

/// Independently optional audit filters, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    /// Exact action match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    /// Exact actor match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Inclusive lower bound on the entry timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the entry timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Whether the entry satisfies every present filter.
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action.is_none_or(|a| entry.action == a)
            && self.user_id.is_none_or(|u| entry.user_id == u)
            && self.start_date.is_none_or(|start| entry.timestamp >= start)
            && self.end_date.is_none_or(|end| entry.timestamp <= end)
    }
}
