//! Read access to the audit ledger.

use std::sync::Arc;

use tracing::debug;

use openwatch_core::error::AppError;
use openwatch_core::result::AppResult;
use openwatch_core::types::{AuditEntryId, PageRequest, PageResponse, RecordId};
use openwatch_database::AuditLedger;
use openwatch_entity::audit::{AuditEntry, AuditFilter};
use openwatch_entity::user::Actor;

use crate::policy;
use crate::response::AuditTrailResponse;

/// Query façade over the audit ledger.
///
/// Per-record trails are public; the system-wide log is admin only.
#[derive(Debug, Clone)]
pub struct AuditService {
    ledger: Arc<dyn AuditLedger>,
    default_page_size: u64,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(ledger: Arc<dyn AuditLedger>, default_page_size: u64) -> Self {
        Self {
            ledger,
            default_page_size,
        }
    }

    /// A page request using the configured default size when none is given.
    pub fn page_request(&self, page: Option<u64>, page_size: Option<u64>) -> PageRequest {
        PageRequest::new(
            page.unwrap_or(1),
            page_size.unwrap_or(self.default_page_size),
        )
    }

    /// Every entry for a record, newest first.
    ///
    /// Works for deleted records too; an unknown id yields an empty trail.
    pub async fn trail(&self, record_id: RecordId) -> AppResult<AuditTrailResponse> {
        let audit_trail = self.ledger.by_record(record_id).await?;
        debug!(record_id = %record_id, entries = audit_trail.len(), "Loaded audit trail");
        Ok(AuditTrailResponse {
            success: true,
            record_id,
            audit_trail,
        })
    }

    /// One entry by id.
    pub async fn get_entry(&self, id: AuditEntryId) -> AppResult<AuditEntry> {
        self.ledger
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Audit entry not found"))
    }

    /// Filtered, paginated system-wide log.
    pub async fn query(
        &self,
        actor: &Actor,
        filter: &AuditFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<AuditEntry>> {
        if !policy::can_view_system_audit(actor) {
            return Err(AppError::forbidden(
                "Insufficient permissions: the system audit log is restricted to admins",
            ));
        }
        self.ledger.query(filter, &page).await
    }
}
