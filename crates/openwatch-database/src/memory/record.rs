//! In-memory record store backed by a sharded concurrent map.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use openwatch_core::error::AppError;
use openwatch_core::result::AppResult;
use openwatch_core::types::{PageRequest, PageResponse, RecordId};
use openwatch_entity::integrity::IntegrityDigest;
use openwatch_entity::record::{CreateRecord, Record, RecordChange, RecordFilter, RecordPatch};
use openwatch_entity::user::Actor;

use crate::store::RecordStore;

/// A stored record plus its insertion sequence number.
#[derive(Debug, Clone)]
struct StoredRecord {
    seq: u64,
    record: Record,
}

/// In-memory record store.
///
/// Each record lives in one `DashMap` shard; `update` holds that shard's
/// write guard for the whole read-merge-write, so updates to the same id
/// serialize while other ids proceed in parallel.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    rows: Arc<DashMap<RecordId, StoredRecord>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(
        &self,
        filter: &RecordFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Record>> {
        let mut matched: Vec<StoredRecord> = self
            .rows
            .iter()
            .filter(|row| filter.matches(&row.record))
            .map(|row| row.value().clone())
            .collect();

        matched.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(a.seq.cmp(&b.seq))
        });

        let total = matched.len() as u64;
        let items = page.slice(matched.into_iter().map(|row| row.record).collect());

        debug!(total, page = page.page, "Listed records");
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn get(&self, id: RecordId) -> AppResult<Option<Record>> {
        Ok(self.rows.get(&id).map(|row| row.record.clone()))
    }

    async fn create_with_id(
        &self,
        id: RecordId,
        data: CreateRecord,
        author: &Actor,
    ) -> AppResult<Record> {
        match self.rows.entry(id) {
            Entry::Occupied(_) => Err(AppError::validation(format!(
                "Record {id} already exists"
            ))),
            Entry::Vacant(slot) => {
                let record = Record::new(id, data, author, Utc::now());
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                slot.insert(StoredRecord {
                    seq,
                    record: record.clone(),
                });
                Ok(record)
            }
        }
    }

    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        actor: &Actor,
    ) -> AppResult<Option<RecordChange>> {
        let Some(mut row) = self.rows.get_mut(&id) else {
            return Ok(None);
        };
        let before = row.record.clone();
        row.record.apply(patch, actor, Utc::now());
        let after = row.record.clone();
        Ok(Some(RecordChange { before, after }))
    }

    async fn delete(&self, id: RecordId) -> AppResult<Option<Record>> {
        Ok(self.rows.remove(&id).map(|(_, row)| row.record))
    }

    async fn attach_integrity(&self, id: RecordId, digest: IntegrityDigest) -> AppResult<bool> {
        match self.rows.get_mut(&id) {
            Some(mut row) => {
                row.record.integrity = Some(digest);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openwatch_core::types::UserId;
    use openwatch_entity::record::RecordStatus;
    use openwatch_entity::user::UserRole;

    fn official() -> Actor {
        Actor::new(UserId::new(), "Demo Official", UserRole::Official)
    }

    fn data(title: &str, department: &str) -> CreateRecord {
        CreateRecord::new(title, "A description long enough to pass.", department)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let record = store
            .create(data("Budget 2024", "Finance"), &actor)
            .await
            .unwrap();

        let fetched = store.get(record.id).await.unwrap().expect("stored");
        assert_eq!(fetched, record);
        assert_eq!(fetched.created_by_name, "Demo Official");
        assert!(store.get(RecordId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_department_filter_and_pagination() {
        let store = MemoryRecordStore::new();
        let actor = official();
        for i in 0..25 {
            let department = if i % 5 < 2 { "Health" } else { "Finance" };
            store
                .create(data(&format!("Record number {i}"), department), &actor)
                .await
                .unwrap();
        }

        let filter = RecordFilter {
            department: Some("Health".into()),
            ..RecordFilter::default()
        };
        let first = store.list(&filter, &PageRequest::new(1, 5)).await.unwrap();
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.total, 10);
        assert_eq!(first.total_pages, 2);

        let third = store.list(&filter, &PageRequest::new(3, 5)).await.unwrap();
        assert!(third.items.is_empty());
        assert_eq!(third.total, 10);
    }

    /// Insert a row directly, with a chosen creation time and sequence.
    fn insert_at(
        store: &MemoryRecordStore,
        title: &str,
        created_at: chrono::DateTime<Utc>,
    ) -> Record {
        let record = Record::new(
            RecordId::new(),
            data(title, "Finance"),
            &official(),
            created_at,
        );
        let seq = store.next_seq.fetch_add(1, Ordering::SeqCst);
        store.rows.insert(
            record.id,
            StoredRecord {
                seq,
                record: record.clone(),
            },
        );
        record
    }

    #[tokio::test]
    async fn test_list_newest_first_with_stable_ties() {
        let store = MemoryRecordStore::new();
        let tied_at = Utc::now();
        let first = insert_at(&store, "Tied record one", tied_at);
        let second = insert_at(&store, "Tied record two", tied_at);
        let older = insert_at(&store, "Older record", tied_at - chrono::Duration::seconds(30));
        let third = insert_at(&store, "Tied record three", tied_at);
        let newest = insert_at(&store, "Newest record", tied_at + chrono::Duration::seconds(30));

        let page = store
            .list(&RecordFilter::default(), &PageRequest::new(1, 10))
            .await
            .unwrap();
        let order: Vec<RecordId> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(
            order,
            vec![newest.id, first.id, second.id, third.id, older.id]
        );
        assert_eq!(page.total, 5);

        // The tie order also holds across a page boundary.
        let second_page = store
            .list(&RecordFilter::default(), &PageRequest::new(2, 2))
            .await
            .unwrap();
        let order: Vec<RecordId> = second_page.items.iter().map(|r| r.id).collect();
        assert_eq!(order, vec![second.id, third.id]);
    }

    #[tokio::test]
    async fn test_create_with_id_rejects_taken_id() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let id = RecordId::new();
        let record = store
            .create_with_id(id, data("Fixed id record", "Finance"), &actor)
            .await
            .unwrap();
        assert_eq!(record.id, id);

        let err = store
            .create_with_id(id, data("Another record", "Health"), &actor)
            .await
            .expect_err("id taken");
        assert_eq!(err.kind, openwatch_core::ErrorKind::Validation);
        assert_eq!(store.get(id).await.unwrap().unwrap().title, "Fixed id record");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_over_title_and_description() {
        let store = MemoryRecordStore::new();
        let actor = official();
        store
            .create(data("Public Health Initiative", "Health"), &actor)
            .await
            .unwrap();
        store
            .create(
                CreateRecord::new("Road plan", "Covers PUBLIC transit expansion.", "Transport"),
                &actor,
            )
            .await
            .unwrap();
        store
            .create(data("Budget 2024", "Finance"), &actor)
            .await
            .unwrap();

        let filter = RecordFilter {
            search: Some("public".into()),
            ..RecordFilter::default()
        };
        let page = store.list(&filter, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_filters_compose_with_and() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let other = official();
        store
            .create(data("Health audit one", "Health"), &actor)
            .await
            .unwrap();
        store
            .create(
                data("Health audit two", "Health").with_status(RecordStatus::Archived),
                &actor,
            )
            .await
            .unwrap();
        store
            .create(data("Health audit three", "Health"), &other)
            .await
            .unwrap();

        let filter = RecordFilter {
            department: Some("Health".into()),
            status: Some(RecordStatus::Active),
            created_by: Some(actor.id),
            ..RecordFilter::default()
        };
        let page = store.list(&filter, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Health audit one");
    }

    #[tokio::test]
    async fn test_update_returns_before_and_after() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let record = store
            .create(data("Budget 2024", "Finance"), &actor)
            .await
            .unwrap();

        let change = store
            .update(record.id, &RecordPatch::status(RecordStatus::Archived), &actor)
            .await
            .unwrap()
            .expect("exists");
        assert_eq!(change.before, record);
        assert_eq!(change.after.status, RecordStatus::Archived);
        assert_eq!(change.after.title, record.title);

        let missing = store
            .update(RecordId::new(), &RecordPatch::status(RecordStatus::Archived), &actor)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let record = store
            .create(data("Budget 2024", "Finance"), &actor)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            let actor = actor.clone();
            handles.push(tokio::spawn(async move {
                let patch = if i % 2 == 0 {
                    RecordPatch {
                        title: Some(format!("Budget revision {i}")),
                        ..RecordPatch::default()
                    }
                } else {
                    RecordPatch::status(RecordStatus::UnderReview)
                };
                store.update(record.id, &patch, &actor).await.unwrap()
            }));
        }
        for handle in handles {
            let change = handle.await.unwrap().expect("exists");
            assert_eq!(change.before.department, "Finance");
        }

        let last = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(last.status, RecordStatus::UnderReview);
        assert!(last.title.starts_with("Budget revision"));
    }

    #[tokio::test]
    async fn test_delete_returns_final_state() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let record = store
            .create(data("Budget 2024", "Finance"), &actor)
            .await
            .unwrap();

        let removed = store.delete(record.id).await.unwrap();
        assert_eq!(removed, Some(record.clone()));
        assert!(store.get(record.id).await.unwrap().is_none());
        assert!(store.delete(record.id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_attach_integrity_keeps_updated_at() {
        let store = MemoryRecordStore::new();
        let actor = official();
        let record = store
            .create(data("Budget 2024", "Finance"), &actor)
            .await
            .unwrap();

        let digest = IntegrityDigest::new("ab".repeat(32), Utc::now());
        assert!(store.attach_integrity(record.id, digest.clone()).await.unwrap());

        let stored = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(stored.integrity, Some(digest));
        assert_eq!(stored.updated_at, record.updated_at);
        assert!(
            !store
                .attach_integrity(RecordId::new(), IntegrityDigest::new("00", Utc::now()))
                .await
                .unwrap()
        );
    }
}
