//! Record listing filters.

use serde::{Deserialize, Serialize};

use openwatch_core::types::UserId;

use super::model::Record;
use super::status::RecordStatus;

/// Independently optional record filters, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    /// Case-insensitive substring match over title and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact department match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Exact status match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    /// Exact creator match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

impl RecordFilter {
    /// Whether the record satisfies every present filter.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !record.title.to_lowercase().contains(&term)
                && !record.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        if let Some(department) = &self.department {
            if &record.department != department {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(created_by) = self.created_by {
            if record.created_by != created_by {
                return false;
            }
        }
        true
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(str::is_empty)
            && self.department.is_none()
            && self.status.is_none()
            && self.created_by.is_none()
    }
}
