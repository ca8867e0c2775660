//! In-memory append-only audit ledger.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use openwatch_core::result::AppResult;
use openwatch_core::types::{AuditEntryId, PageRequest, PageResponse, RecordId};
use openwatch_entity::audit::{AuditEntry, AuditFilter, CreateAuditEntry};

use crate::store::AuditLedger;

/// Internal state guarded by the ledger lock.
#[derive(Debug, Default)]
struct LedgerState {
    /// Entries in insertion order.
    entries: Vec<AuditEntry>,
    /// Timestamp of the most recent entry.
    last_timestamp: Option<DateTime<Utc>>,
}

impl LedgerState {
    /// Next timestamp, strictly after the previous one.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }

    /// Next entry id. Entries are numbered from one, so a fresh ledger fed
    /// the same appends hands out the same ids.
    fn next_id(&self) -> AuditEntryId {
        AuditEntryId::from_uuid(Uuid::from_u128(self.entries.len() as u128 + 1))
    }
}

/// In-memory audit ledger.
///
/// Identity and timestamp are assigned under the write lock, so concurrent
/// appends never observe the same slot. Readers share the lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl MemoryAuditLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries ever appended.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// Whether nothing has been appended yet.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

/// Newest first; equal timestamps keep insertion order.
fn newest_first(entries: &mut [AuditEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[async_trait]
impl AuditLedger for MemoryAuditLedger {
    async fn append(&self, entry: CreateAuditEntry) -> AppResult<AuditEntry> {
        let mut state = self.state.write().await;
        let timestamp = state.next_timestamp();
        let entry = entry.into_entry(state.next_id(), timestamp);
        state.entries.push(entry.clone());
        debug!(
            audit_id = %entry.id,
            record_id = %entry.record_id,
            action = %entry.action,
            "Audit entry appended"
        );
        Ok(entry)
    }

    async fn get(&self, id: AuditEntryId) -> AppResult<Option<AuditEntry>> {
        let state = self.state.read().await;
        Ok(state.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn by_record(&self, record_id: RecordId) -> AppResult<Vec<AuditEntry>> {
        let mut trail: Vec<AuditEntry> = {
            let state = self.state.read().await;
            state
                .entries
                .iter()
                .filter(|e| e.record_id == record_id)
                .cloned()
                .collect()
        };
        newest_first(&mut trail);
        Ok(trail)
    }

    async fn query(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditEntry>> {
        let mut matched: Vec<AuditEntry> = {
            let state = self.state.read().await;
            state
                .entries
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect()
        };
        newest_first(&mut matched);

        let total = matched.len() as u64;
        let items = page.slice(matched);
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}
