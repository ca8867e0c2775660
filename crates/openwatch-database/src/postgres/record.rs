//! PostgreSQL record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use openwatch_core::error::{AppError, ErrorKind};
use openwatch_core::result::AppResult;
use openwatch_core::types::{PageRequest, PageResponse, RecordId, UserId};
use openwatch_entity::integrity::IntegrityDigest;
use openwatch_entity::record::{
    CreateRecord, Record, RecordChange, RecordFilter, RecordPatch, RecordStatus,
};
use openwatch_entity::user::Actor;

use super::{db_err, db_now, like_pattern};
use crate::store::RecordStore;

const COLUMNS: &str = "id, title, description, department, status, created_by, \
     created_by_name, created_at, updated_at, updated_by, updated_by_name, integrity";

/// Row shape of the `records` table.
#[derive(Debug, FromRow)]
struct RecordRow {
    id: Uuid,
    title: String,
    description: String,
    department: String,
    status: String,
    created_by: Uuid,
    created_by_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
    updated_by_name: Option<String>,
    integrity: Option<Json<IntegrityDigest>>,
}

impl TryFrom<RecordRow> for Record {
    type Error = AppError;

    fn try_from(row: RecordRow) -> AppResult<Self> {
        let status: RecordStatus = row.status.parse().map_err(|e: AppError| {
            AppError::new(
                ErrorKind::Database,
                format!("Corrupt status on record {}: {}", row.id, e.message),
            )
        })?;
        Ok(Self {
            id: RecordId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            department: row.department,
            status,
            created_by: UserId::from_uuid(row.created_by),
            created_by_name: row.created_by_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by.map(UserId::from_uuid),
            updated_by_name: row.updated_by_name,
            integrity: row.integrity.map(|Json(digest)| digest),
        })
    }
}

/// Append the WHERE clause for `filter`.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    qb.push(" WHERE TRUE");
    if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(department) = &filter.department {
        qb.push(" AND department = ").push_bind(department.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(created_by) = filter.created_by {
        qb.push(" AND created_by = ").push_bind(created_by.into_uuid());
    }
}

/// Record store over the `records` table.
///
/// Updates lock the target row with `SELECT ... FOR UPDATE` inside a
/// transaction, so the snapshot and merge see no concurrent writer.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a store over an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(
        &self,
        filter: &RecordFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Record>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM records");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count records"))?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM records"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, seq ASC LIMIT ")
            .push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        let rows: Vec<RecordRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list records"))?;

        let items = rows
            .into_iter()
            .map(Record::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        debug!(total, page = page.page, "Listed records");
        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn get(&self, id: RecordId) -> AppResult<Option<Record>> {
        sqlx::query_as::<_, RecordRow>(&format!("SELECT {COLUMNS} FROM records WHERE id = $1"))
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find record"))?
            .map(Record::try_from)
            .transpose()
    }

    async fn create_with_id(
        &self,
        id: RecordId,
        data: CreateRecord,
        author: &Actor,
    ) -> AppResult<Record> {
        let record = Record::new(id, data, author, db_now());
        sqlx::query(
            "INSERT INTO records (id, title, description, department, status, created_by, \
             created_by_name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.id.into_uuid())
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.department)
        .bind(record.status.as_str())
        .bind(record.created_by.into_uuid())
        .bind(&record.created_by_name)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to insert record"))?;
        Ok(record)
    }

    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        actor: &Actor,
    ) -> AppResult<Option<RecordChange>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "SELECT {COLUMNS} FROM records WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to lock record"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let before = Record::try_from(row)?;
        let mut after = before.clone();
        after.apply(patch, actor, db_now());

        sqlx::query(
            "UPDATE records SET title = $2, description = $3, department = $4, status = $5, \
             updated_at = $6, updated_by = $7, updated_by_name = $8 WHERE id = $1",
        )
        .bind(id.into_uuid())
        .bind(&after.title)
        .bind(&after.description)
        .bind(&after.department)
        .bind(after.status.as_str())
        .bind(after.updated_at)
        .bind(after.updated_by.map(UserId::into_uuid))
        .bind(&after.updated_by_name)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to update record"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit record update"))?;
        Ok(Some(RecordChange { before, after }))
    }

    async fn delete(&self, id: RecordId) -> AppResult<Option<Record>> {
        sqlx::query_as::<_, RecordRow>(&format!(
            "DELETE FROM records WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to delete record"))?
        .map(Record::try_from)
        .transpose()
    }

    async fn attach_integrity(&self, id: RecordId, digest: IntegrityDigest) -> AppResult<bool> {
        let result = sqlx::query("UPDATE records SET integrity = $2 WHERE id = $1")
            .bind(id.into_uuid())
            .bind(Json(digest))
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to store integrity digest"))?;
        Ok(result.rows_affected() > 0)
    }
}
