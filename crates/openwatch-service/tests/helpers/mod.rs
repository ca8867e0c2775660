//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use openwatch_core::error::AppError;
use openwatch_core::result::AppResult;
use openwatch_core::types::{AuditEntryId, PageRequest, PageResponse, RecordId};
use openwatch_database::{AuditLedger, MemoryAuditLedger, MemoryRecordStore, RecordStore};
use openwatch_entity::audit::{AuditEntry, AuditFilter, CreateAuditEntry};
use openwatch_entity::integrity::AnchorReceipt;
use openwatch_entity::record::CreateRecord;
use openwatch_entity::user::Actor;
use openwatch_integrity::{IntegrityAnchor, NoopAnchor};
use openwatch_service::{AuditService, DemoActors, RecordService, RequestContext, ServiceSettings};

/// A fully wired service over in-memory stores.
pub struct TestApp {
    pub records: Arc<dyn RecordStore>,
    pub ledger: Arc<dyn AuditLedger>,
    pub service: RecordService,
    pub audit: AuditService,
    pub actors: DemoActors,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(
            Arc::new(MemoryAuditLedger::new()),
            Arc::new(NoopAnchor),
            ServiceSettings::default(),
        )
    }

    pub fn with_ledger(ledger: Arc<dyn AuditLedger>) -> Self {
        Self::build(ledger, Arc::new(NoopAnchor), ServiceSettings::default())
    }

    pub fn with_anchor(anchor: Arc<dyn IntegrityAnchor>, settings: ServiceSettings) -> Self {
        Self::build(Arc::new(MemoryAuditLedger::new()), anchor, settings)
    }

    fn build(
        ledger: Arc<dyn AuditLedger>,
        anchor: Arc<dyn IntegrityAnchor>,
        settings: ServiceSettings,
    ) -> Self {
        let records: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let service = RecordService::new(records.clone(), ledger.clone(), anchor, settings);
        let audit = AuditService::new(ledger.clone(), 50);
        Self {
            records,
            ledger,
            service,
            audit,
            actors: DemoActors::new(),
        }
    }

    pub fn official(&self) -> RequestContext {
        RequestContext::new(self.actors.official.clone())
    }

    pub fn admin(&self) -> RequestContext {
        RequestContext::new(self.actors.admin.clone())
    }

    pub fn citizen(&self) -> RequestContext {
        RequestContext::new(self.actors.citizen.clone())
    }

    /// Every audit entry in the ledger, newest first.
    pub async fn all_entries(&self) -> Vec<AuditEntry> {
        self.audit
            .query(
                &self.actors.admin,
                &AuditFilter::default(),
                PageRequest::new(1, 100),
            )
            .await
            .expect("admin can query")
            .items
    }
}

pub fn record_data(title: &str, department: &str) -> CreateRecord {
    CreateRecord::new(title, "A description that is long enough.", department)
}

pub fn other_official() -> Actor {
    Actor::new(
        openwatch_core::types::UserId::new(),
        "Second Official",
        openwatch_entity::user::UserRole::Official,
    )
}

/// A ledger whose appends always fail; reads see nothing.
#[derive(Debug, Default)]
pub struct FailingLedger;

#[async_trait]
impl AuditLedger for FailingLedger {
    async fn append(&self, _entry: CreateAuditEntry) -> AppResult<AuditEntry> {
        Err(AppError::database("audit ledger offline"))
    }

    async fn get(&self, _id: AuditEntryId) -> AppResult<Option<AuditEntry>> {
        Ok(None)
    }

    async fn by_record(&self, _record_id: RecordId) -> AppResult<Vec<AuditEntry>> {
        Ok(Vec::new())
    }

    async fn query(
        &self,
        _filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditEntry>> {
        Ok(PageResponse::empty(page))
    }
}

/// An anchor that never answers.
#[derive(Debug, Default)]
pub struct HangingAnchor;

#[async_trait]
impl IntegrityAnchor for HangingAnchor {
    fn name(&self) -> &'static str {
        "hanging"
    }

    async fn anchor(&self, _record_id: RecordId, _digest: &str) -> AnchorReceipt {
        std::future::pending().await
    }

    async fn fetch(&self, _record_id: RecordId) -> AppResult<Option<String>> {
        std::future::pending().await
    }
}

/// An anchor that keeps digests in memory.
#[derive(Debug, Default)]
pub struct RecordingAnchor {
    digests: Mutex<HashMap<RecordId, String>>,
}

impl RecordingAnchor {
    pub fn tamper(&self, record_id: RecordId, digest: &str) {
        self.digests
            .lock()
            .expect("lock")
            .insert(record_id, digest.to_string());
    }
}

#[async_trait]
impl IntegrityAnchor for RecordingAnchor {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn anchor(&self, record_id: RecordId, digest: &str) -> AnchorReceipt {
        let mut digests = self.digests.lock().expect("lock");
        digests.insert(record_id, digest.to_string());
        AnchorReceipt::anchored(format!("tx-{}", digests.len()))
    }

    async fn fetch(&self, record_id: RecordId) -> AppResult<Option<String>> {
        Ok(self.digests.lock().expect("lock").get(&record_id).cloned())
    }
}
