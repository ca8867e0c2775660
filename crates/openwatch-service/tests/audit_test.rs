//! Integration tests for audit trail queries.

mod helpers;

use chrono::Duration;

use openwatch_core::ErrorKind;
use openwatch_core::types::{AuditEntryId, PageRequest, RecordId};
use openwatch_entity::audit::{AuditAction, AuditFilter};
use openwatch_entity::record::{RecordPatch, RecordStatus};

use helpers::{TestApp, record_data};

#[tokio::test]
async fn test_system_log_is_newest_first() {
    let app = TestApp::new();
    let mut ids = Vec::new();
    for title in ["First record", "Second record", "Third record"] {
        let record = app
            .service
            .create_record(&app.official(), record_data(title, "Finance"))
            .await
            .unwrap()
            .record;
        ids.push(record.id);
    }

    let entries = app.all_entries().await;
    let order: Vec<_> = entries.iter().map(|e| e.record_id).collect();
    ids.reverse();
    assert_eq!(order, ids);
    for pair in entries.windows(2) {
        assert!(pair[0].timestamp > pair[1].timestamp);
    }
}

#[tokio::test]
async fn test_trail_survives_deletion() {
    let app = TestApp::new();
    let record = app
        .service
        .create_record(&app.official(), record_data("Short lived", "Finance"))
        .await
        .unwrap()
        .record;
    app.service
        .update_record(
            &app.official(),
            record.id,
            RecordPatch::status(RecordStatus::Archived),
        )
        .await
        .unwrap();
    app.service
        .delete_record(&app.admin(), record.id)
        .await
        .unwrap();

    let trail = app.audit.trail(record.id).await.unwrap();
    assert!(trail.success);
    let actions: Vec<_> = trail.audit_trail.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Delete, AuditAction::Update, AuditAction::Create]
    );
}

#[tokio::test]
async fn test_system_log_filters() {
    let app = TestApp::new();
    let record = app
        .service
        .create_record(&app.official(), record_data("Filtered record", "Finance"))
        .await
        .unwrap()
        .record;
    app.service
        .update_record(
            &app.admin(),
            record.id,
            RecordPatch::status(RecordStatus::UnderReview),
        )
        .await
        .unwrap();

    let by_action = AuditFilter {
        action: Some(AuditAction::Update),
        ..AuditFilter::default()
    };
    let page = app
        .audit
        .query(&app.actors.admin, &by_action, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user_id, app.actors.admin.id);

    let by_user = AuditFilter {
        user_id: Some(app.actors.official.id),
        ..AuditFilter::default()
    };
    let page = app
        .audit
        .query(&app.actors.admin, &by_user, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].action, AuditAction::Create);

    let newest = page.items[0].timestamp;
    let future_only = AuditFilter {
        start_date: Some(newest + Duration::days(1)),
        ..AuditFilter::default()
    };
    let page = app
        .audit
        .query(&app.actors.admin, &future_only, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_system_log_requires_admin() {
    let app = TestApp::new();
    for actor in [&app.actors.official, &app.actors.citizen] {
        let err = app
            .audit
            .query(actor, &AuditFilter::default(), PageRequest::default())
            .await
            .expect_err("not admin");
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
}

#[tokio::test]
async fn test_get_entry() {
    let app = TestApp::new();
    let record = app
        .service
        .create_record(&app.official(), record_data("Lookup record", "Finance"))
        .await
        .unwrap()
        .record;
    let entry = app.audit.trail(record.id).await.unwrap().audit_trail[0].clone();

    let fetched = app.audit.get_entry(entry.id).await.unwrap();
    assert_eq!(fetched, entry);

    let err = app
        .audit
        .get_entry(AuditEntryId::new())
        .await
        .expect_err("missing");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_unknown_record_has_empty_trail() {
    let app = TestApp::new();
    let trail = app.audit.trail(RecordId::new()).await.unwrap();
    assert!(trail.audit_trail.is_empty());
}
