//! The record service: authorize, mutate, audit, seal.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use openwatch_core::error::{AppError, ErrorKind};
use openwatch_core::result::AppResult;
use openwatch_core::types::{OperationWarning, PageRequest, PageResponse, RecordId};
use openwatch_database::{AuditLedger, RecordStore};
use openwatch_entity::audit::{AuditAction, AuditEntry, CreateAuditEntry};
use openwatch_entity::integrity::{AnchorReceipt, IntegrityDigest};
use openwatch_entity::record::{CreateRecord, Record, RecordFilter, RecordPatch};
use openwatch_integrity::{IntegrityAnchor, digest_for, fingerprint};

use super::settings::ServiceSettings;
use crate::context::RequestContext;
use crate::policy::{self, MutationAction};
use crate::response::{DeleteResponse, RecordResponse, VerificationReport};

/// Composes the record store, audit ledger, fingerprinter and anchor.
///
/// A successful mutation always stands: a failed audit append becomes a
/// warning on the response, and a failed or slow anchor becomes an error
/// inside the digest receipt. Anchoring runs after the store and ledger
/// calls have returned, so it never holds their locks.
#[derive(Debug, Clone)]
pub struct RecordService {
    records: Arc<dyn RecordStore>,
    audit: Arc<dyn AuditLedger>,
    anchor: Arc<dyn IntegrityAnchor>,
    settings: ServiceSettings,
}

impl RecordService {
    /// Creates a new record service.
    pub fn new(
        records: Arc<dyn RecordStore>,
        audit: Arc<dyn AuditLedger>,
        anchor: Arc<dyn IntegrityAnchor>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            records,
            audit,
            anchor,
            settings,
        }
    }

    /// A page request using the configured default size when none is given.
    pub fn page_request(&self, page: Option<u64>, page_size: Option<u64>) -> PageRequest {
        PageRequest::new(
            page.unwrap_or(1),
            page_size.unwrap_or(self.settings.default_page_size),
        )
    }

    /// Lists records. Public.
    pub async fn list_records(
        &self,
        filter: &RecordFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Record>> {
        self.records.list(filter, &page).await
    }

    /// Fetches one record. Public.
    pub async fn get_record(&self, id: RecordId) -> AppResult<RecordResponse> {
        let record = self.find(id).await?;
        Ok(RecordResponse::new(record, Vec::new()))
    }

    /// Creates a record owned by the caller.
    pub async fn create_record(
        &self,
        ctx: &RequestContext,
        data: CreateRecord,
    ) -> AppResult<RecordResponse> {
        self.create_record_with_id(ctx, RecordId::new(), data).await
    }

    /// Creates a record under a caller-chosen id, for seeding and imports.
    ///
    /// Same checks, audit entry and digest as [`Self::create_record`].
    pub async fn create_record_with_id(
        &self,
        ctx: &RequestContext,
        id: RecordId,
        data: CreateRecord,
    ) -> AppResult<RecordResponse> {
        let actor = &ctx.actor;
        policy::authorize(actor, None, MutationAction::Create)?;
        data.check()?;

        let mut record = self.records.create_with_id(id, data.clone(), actor).await?;
        info!(
            record_id = %record.id,
            user_id = %actor.id,
            department = %record.department,
            status = %record.status,
            requested_at = %ctx.request_time,
            "Record created"
        );

        let mut warnings = Vec::new();
        let appended = self
            .write_audit(ctx, record.id, AuditAction::Create, Some(&data), None)
            .await;
        warnings.extend(audit_warning(appended, record.id, AuditAction::Create));

        if let Some(digest) = self.seal(&record).await {
            record.integrity = Some(digest);
        }

        Ok(RecordResponse::new(record, warnings))
    }

    /// Applies a partial update.
    ///
    /// Admins may update any record, officials only their own.
    pub async fn update_record(
        &self,
        ctx: &RequestContext,
        id: RecordId,
        patch: RecordPatch,
    ) -> AppResult<RecordResponse> {
        let actor = &ctx.actor;
        policy::authorize(actor, None, MutationAction::Update)?;
        patch.check()?;

        // `created_by` never changes, so the ownership decision taken on
        // this read still holds inside the store's critical section.
        let existing = self.find(id).await?;
        policy::authorize(actor, Some(&existing), MutationAction::Update)?;

        let change = self
            .records
            .update(id, &patch, actor)
            .await?
            .ok_or_else(|| AppError::not_found("Record not found"))?;
        info!(
            record_id = %id,
            user_id = %actor.id,
            requested_at = %ctx.request_time,
            "Record updated"
        );

        let mut warnings = Vec::new();
        let appended = self
            .write_audit(
                ctx,
                id,
                AuditAction::Update,
                Some(&patch),
                Some(&change.before),
            )
            .await;
        warnings.extend(audit_warning(appended, id, AuditAction::Update));

        let mut record = change.after;
        if self.settings.refresh_on_update {
            if let Some(digest) = self.seal(&record).await {
                record.integrity = Some(digest);
            }
        }

        Ok(RecordResponse::new(record, warnings))
    }

    /// Removes a record. Admin only.
    pub async fn delete_record(
        &self,
        ctx: &RequestContext,
        id: RecordId,
    ) -> AppResult<DeleteResponse> {
        let actor = &ctx.actor;
        policy::authorize(actor, None, MutationAction::Delete)?;

        let removed = self
            .records
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Record not found"))?;
        info!(
            record_id = %id,
            user_id = %actor.id,
            requested_at = %ctx.request_time,
            "Record deleted"
        );

        let appended = self
            .write_audit(
                ctx,
                id,
                AuditAction::Delete,
                None::<&RecordPatch>,
                Some(&removed),
            )
            .await;
        let warnings = audit_warning(appended, id, AuditAction::Delete)
            .into_iter()
            .collect();

        Ok(DeleteResponse {
            success: true,
            record_id: id,
            message: "Record deleted successfully".to_string(),
            warnings,
        })
    }

    /// Recompute a record's fingerprint and compare it with its sealed digest
    /// and, when an anchor is configured, with the externally held one.
    pub async fn verify_record(&self, id: RecordId) -> AppResult<VerificationReport> {
        let record = self.find(id).await?;
        let current_hash = fingerprint(&record)?;
        let stored_hash = record.integrity.as_ref().map(|d| d.hash.clone());
        let local_match = stored_hash.as_deref() == Some(current_hash.as_str());

        let anchored_match = match (&stored_hash, self.anchor.is_configured()) {
            (Some(hash), true) => Some(
                tokio::time::timeout(
                    self.settings.anchor_timeout,
                    self.anchor.verify(id, hash),
                )
                .await
                .unwrap_or_else(|_| {
                    warn!(record_id = %id, anchor = self.anchor.name(), "Anchor verification timed out");
                    false
                }),
            ),
            (None, true) => Some(false),
            (_, false) => None,
        };

        debug!(record_id = %id, local_match, ?anchored_match, "Record verified");
        Ok(VerificationReport {
            record_id: id,
            current_hash,
            stored_hash,
            local_match,
            anchored_match,
            verified_at: Utc::now(),
        })
    }

    async fn find(&self, id: RecordId) -> AppResult<Record> {
        self.records
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Record not found"))
    }

    async fn write_audit<C: Serialize + Sync>(
        &self,
        ctx: &RequestContext,
        record_id: RecordId,
        action: AuditAction,
        changes: Option<&C>,
        previous: Option<&Record>,
    ) -> AppResult<AuditEntry> {
        let entry = CreateAuditEntry {
            record_id,
            action,
            user_id: ctx.actor.id,
            user_name: ctx.actor.name.clone(),
            changes: changes.map(serde_json::to_value).transpose()?,
            previous_data: previous.map(serde_json::to_value).transpose()?,
            ip_address: ctx
                .ip_address
                .clone()
                .unwrap_or_else(|| self.settings.default_ip_address.clone()),
            user_agent: ctx
                .user_agent
                .clone()
                .unwrap_or_else(|| self.settings.default_user_agent.clone()),
        };
        self.audit.append(entry).await
    }

    /// Fingerprint, anchor under a timeout, and store the digest.
    ///
    /// Returns `None` only when the fingerprint itself cannot be computed.
    async fn seal(&self, record: &Record) -> Option<IntegrityDigest> {
        let digest = match digest_for(record) {
            Ok(digest) => digest,
            Err(e) => {
                warn!(record_id = %record.id, error = %e, "Fingerprint failed");
                return None;
            }
        };

        let timeout = self.settings.anchor_timeout;
        let receipt = match tokio::time::timeout(timeout, self.anchor.anchor(record.id, &digest.hash))
            .await
        {
            Ok(receipt) => receipt,
            Err(_) => {
                warn!(
                    record_id = %record.id,
                    anchor = self.anchor.name(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Anchor timed out, using local hash only"
                );
                AnchorReceipt::failed(format!(
                    "Anchor timed out after {} ms",
                    timeout.as_millis()
                ))
            }
        };
        let digest = digest.with_receipt(receipt);

        match self.records.attach_integrity(record.id, digest.clone()).await {
            Ok(true) => {}
            Ok(false) => debug!(record_id = %record.id, "Record removed before digest was stored"),
            Err(e) => warn!(record_id = %record.id, error = %e, "Failed to store digest"),
        }
        Some(digest)
    }
}

/// Turn a failed append into a warning; the mutation itself stands.
fn audit_warning(
    appended: AppResult<AuditEntry>,
    record_id: RecordId,
    action: AuditAction,
) -> Option<OperationWarning> {
    match appended {
        Ok(entry) => {
            debug!(audit_id = %entry.id, record_id = %record_id, action = %action, "Audit entry written");
            None
        }
        Err(e) => {
            error!(
                record_id = %record_id,
                action = %action,
                error = %e,
                "Audit append failed after committed mutation"
            );
            Some(OperationWarning {
                kind: ErrorKind::AuditWrite,
                message: format!(
                    "{action} on record {record_id} was committed but its audit entry could not be written: {}",
                    e.message
                ),
            })
        }
    }
}
