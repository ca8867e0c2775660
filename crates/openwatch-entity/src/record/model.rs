//! Public record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use openwatch_core::result::AppResult;
use openwatch_core::types::{RecordId, UserId};

use super::status::RecordStatus;
use crate::integrity::IntegrityDigest;
use crate::user::Actor;
use crate::validation::{self, not_blank};

/// A public record held by the transparency portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Stable identifier assigned at creation.
    pub id: RecordId,
    /// Short headline.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Owning department.
    pub department: String,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// The user who created the record.
    pub created_by: UserId,
    /// Creator display name at creation time.
    pub created_by_name: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last changed.
    pub updated_at: DateTime<Utc>,
    /// The user who last changed the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserId>,
    /// Display name of the last editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_name: Option<String>,
    /// Tamper-evidence checkpoint computed at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<IntegrityDigest>,
}

impl Record {
    /// Build a freshly created record owned by `author`.
    pub fn new(id: RecordId, data: CreateRecord, author: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            department: data.department,
            status: data.status.unwrap_or_default(),
            created_by: author.id,
            created_by_name: author.name.clone(),
            created_at: now,
            updated_at: now,
            updated_by: None,
            updated_by_name: None,
            integrity: None,
        }
    }

    /// Merge a patch over this record.
    ///
    /// Only fields present in the patch are overwritten. `updated_at` never
    /// moves backwards past `created_at`.
    pub fn apply(&mut self, patch: &RecordPatch, actor: &Actor, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(department) = &patch.department {
            self.department = department.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = now.max(self.created_at);
        self.updated_by = Some(actor.id);
        self.updated_by_name = Some(actor.name.clone());
    }
}

/// Field set supplied when creating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    /// Short headline.
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: String,
    /// Full description.
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    /// Owning department.
    #[validate(
        length(min = 2, message = "Department is required"),
        custom(function = "not_blank", message = "Department is required")
    )]
    pub department: String,
    /// Initial status; defaults to `Active`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

impl CreateRecord {
    /// Create a new field set with the default status.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            department: department.into(),
            status: None,
        }
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Check every field, reporting all failures at once.
    pub fn check(&self) -> AppResult<()> {
        self.validate().map_err(validation::into_app_error)
    }
}

/// Partial update; absent fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    /// New headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    /// New department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 2, message = "Department is required"),
        custom(function = "not_blank", message = "Department is required")
    )]
    pub department: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

impl RecordPatch {
    /// A patch that only changes the status.
    pub fn status(status: RecordStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.department.is_none()
            && self.status.is_none()
    }

    /// Check every present field, reporting all failures at once.
    pub fn check(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(openwatch_core::AppError::validation(
                "Update must change at least one field",
            ));
        }
        self.validate().map_err(validation::into_app_error)
    }
}

/// The before/after pair produced by an atomic update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChange {
    /// Snapshot taken inside the critical section, before the merge.
    pub before: Record,
    /// The stored state after the merge.
    pub after: Record,
}
