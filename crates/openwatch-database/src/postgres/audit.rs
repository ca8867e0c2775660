//! PostgreSQL audit ledger.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use openwatch_core::error::{AppError, ErrorKind};
use openwatch_core::result::AppResult;
use openwatch_core::types::{AuditEntryId, PageRequest, PageResponse, RecordId, UserId};
use openwatch_entity::audit::{AuditAction, AuditEntry, AuditFilter, CreateAuditEntry};

use super::{db_err, db_now};
use crate::store::AuditLedger;

const COLUMNS: &str = "id, record_id, action, user_id, user_name, changes, previous_data, \
     timestamp, ip_address, user_agent";

/// Advisory lock key serializing timestamp assignment across connections.
const APPEND_LOCK_KEY: i64 = 0x6f77_6175_6469_74;

#[derive(Debug, FromRow)]
struct AuditRow {
    id: Uuid,
    record_id: Uuid,
    action: String,
    user_id: Uuid,
    user_name: String,
    changes: Option<Json<serde_json::Value>>,
    previous_data: Option<Json<serde_json::Value>>,
    timestamp: DateTime<Utc>,
    ip_address: String,
    user_agent: String,
}

impl TryFrom<AuditRow> for AuditEntry {
    type Error = AppError;

    fn try_from(row: AuditRow) -> AppResult<Self> {
        let action: AuditAction = row.action.parse().map_err(|e: AppError| {
            AppError::new(
                ErrorKind::Database,
                format!("Corrupt action on audit entry {}: {}", row.id, e.message),
            )
        })?;
        Ok(Self {
            id: AuditEntryId::from_uuid(row.id),
            record_id: RecordId::from_uuid(row.record_id),
            action,
            user_id: UserId::from_uuid(row.user_id),
            user_name: row.user_name,
            changes: row.changes.map(|Json(v)| v),
            previous_data: row.previous_data.map(|Json(v)| v),
            timestamp: row.timestamp,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
        })
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &AuditFilter) {
    qb.push(" WHERE TRUE");
    if let Some(action) = filter.action {
        qb.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id.into_uuid());
    }
    if let Some(start) = filter.start_date {
        qb.push(" AND timestamp >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND timestamp <= ").push_bind(end);
    }
}

/// Append-only ledger over the `audit_entries` table.
///
/// Appends take a transaction-scoped advisory lock before reading the
/// latest timestamp, so timestamps stay strictly increasing even with
/// several processes writing.
#[derive(Debug, Clone)]
pub struct PgAuditLedger {
    pool: PgPool,
}

impl PgAuditLedger {
    /// Create a ledger over an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLedger for PgAuditLedger {
    async fn append(&self, entry: CreateAuditEntry) -> AppResult<AuditEntry> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin audit transaction"))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(APPEND_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to acquire audit lock"))?;

        let last: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(timestamp) FROM audit_entries")
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err("Failed to read latest audit timestamp"))?;

        let now = db_now();
        let timestamp = match last {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        let entry = entry.into_entry(AuditEntryId::new(), timestamp);

        sqlx::query(
            "INSERT INTO audit_entries (id, record_id, action, user_id, user_name, changes, \
             previous_data, timestamp, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(entry.id.into_uuid())
        .bind(entry.record_id.into_uuid())
        .bind(entry.action.as_str())
        .bind(entry.user_id.into_uuid())
        .bind(&entry.user_name)
        .bind(entry.changes.as_ref().map(Json))
        .bind(entry.previous_data.as_ref().map(Json))
        .bind(entry.timestamp)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to insert audit entry"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit audit entry"))?;

        debug!(
            audit_id = %entry.id,
            record_id = %entry.record_id,
            action = %entry.action,
            "Audit entry appended"
        );
        Ok(entry)
    }

    async fn get(&self, id: AuditEntryId) -> AppResult<Option<AuditEntry>> {
        sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {COLUMNS} FROM audit_entries WHERE id = $1"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find audit entry"))?
        .map(AuditEntry::try_from)
        .transpose()
    }

    async fn by_record(&self, record_id: RecordId) -> AppResult<Vec<AuditEntry>> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {COLUMNS} FROM audit_entries WHERE record_id = $1 \
             ORDER BY timestamp DESC, seq ASC"
        ))
        .bind(record_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load audit trail"))?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }

    async fn query(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditEntry>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_entries");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count audit entries"))?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM audit_entries"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY timestamp DESC, seq ASC LIMIT ")
            .push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        let rows: Vec<AuditRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to query audit entries"))?;

        let items = rows
            .into_iter()
            .map(AuditEntry::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
