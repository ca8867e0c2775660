//! Backend selection.

use std::sync::Arc;

use tracing::info;

use openwatch_core::config::{DatabaseBackend, DatabaseConfig};
use openwatch_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryAuditLedger, MemoryRecordStore};
use crate::migration::run_migrations;
use crate::postgres::{PgAuditLedger, PgRecordStore};
use crate::store::{AuditLedger, RecordStore};

/// The pair of stores the record service runs against.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Current record state.
    pub records: Arc<dyn RecordStore>,
    /// Append-only audit trail.
    pub audit: Arc<dyn AuditLedger>,
    /// Underlying pool when the postgres backend is active.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Fresh in-memory stores.
    pub fn memory() -> Self {
        Self {
            records: Arc::new(MemoryRecordStore::new()),
            audit: Arc::new(MemoryAuditLedger::new()),
            pool: None,
        }
    }

    /// Open the configured backend, migrating the schema for postgres.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Memory => {
                info!("Using in-memory record store and audit ledger");
                Ok(Self::memory())
            }
            DatabaseBackend::Postgres => {
                let db = DatabasePool::connect(config).await?;
                run_migrations(&db).await?;
                Ok(Self {
                    records: Arc::new(PgRecordStore::new(db.pool().clone())),
                    audit: Arc::new(PgAuditLedger::new(db.pool().clone())),
                    pool: Some(db),
                })
            }
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(db) = &self.pool {
            db.close().await;
        }
    }
}
