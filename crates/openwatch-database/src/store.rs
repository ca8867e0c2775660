//! Storage contracts for records and audit entries.
//!
//! The record service only ever talks to these traits, so any engine that
//! honours the documented semantics is a drop-in replacement.

use async_trait::async_trait;

use openwatch_core::result::AppResult;
use openwatch_core::types::{AuditEntryId, PageRequest, PageResponse, RecordId};
use openwatch_entity::audit::{AuditEntry, AuditFilter, CreateAuditEntry};
use openwatch_entity::integrity::IntegrityDigest;
use openwatch_entity::record::{CreateRecord, Record, RecordChange, RecordFilter, RecordPatch};
use openwatch_entity::user::Actor;

/// Current record state.
///
/// Implementations must make `update` a single critical section per record:
/// the snapshot, merge and write happen without another writer to the same
/// id interleaving. Operations on different ids may run in parallel.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// List records matching `filter`, newest `created_at` first.
    ///
    /// Ties keep insertion order. `total` counts every match before
    /// pagination; pages past the end are empty.
    async fn list(&self, filter: &RecordFilter, page: &PageRequest)
    -> AppResult<PageResponse<Record>>;

    /// Fetch a record by id.
    async fn get(&self, id: RecordId) -> AppResult<Option<Record>>;

    /// Insert a new record owned by `author`, assigning id and timestamps.
    async fn create(&self, data: CreateRecord, author: &Actor) -> AppResult<Record> {
        self.create_with_id(RecordId::new(), data, author).await
    }

    /// Insert a new record under a caller-chosen id.
    ///
    /// Fails when the id is already taken.
    async fn create_with_id(
        &self,
        id: RecordId,
        data: CreateRecord,
        author: &Actor,
    ) -> AppResult<Record>;

    /// Merge `patch` into the record atomically.
    ///
    /// Returns `None` when the record does not exist.
    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        actor: &Actor,
    ) -> AppResult<Option<RecordChange>>;

    /// Remove a record, returning its final state, or `None` if absent.
    async fn delete(&self, id: RecordId) -> AppResult<Option<Record>>;

    /// Store an integrity digest on the record without touching `updated_at`.
    ///
    /// Returns `false` when the record no longer exists.
    async fn attach_integrity(&self, id: RecordId, digest: IntegrityDigest) -> AppResult<bool>;
}

/// Append-only audit ledger.
///
/// There is deliberately no update or delete operation.
#[async_trait]
pub trait AuditLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Append an entry, assigning its id and a non-decreasing timestamp.
    async fn append(&self, entry: CreateAuditEntry) -> AppResult<AuditEntry>;

    /// Fetch one entry.
    async fn get(&self, id: AuditEntryId) -> AppResult<Option<AuditEntry>>;

    /// Every entry for a record, newest first.
    async fn by_record(&self, record_id: RecordId) -> AppResult<Vec<AuditEntry>>;

    /// Filtered, paginated view over all entries, newest first.
    async fn query(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditEntry>>;
}
