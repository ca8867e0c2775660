//! Integration tests for sealing and verifying records.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use openwatch_core::ErrorKind;
use openwatch_core::types::RecordId;
use openwatch_entity::record::{RecordPatch, RecordStatus};
use openwatch_integrity::fingerprint;
use openwatch_service::ServiceSettings;

use helpers::{FailingLedger, HangingAnchor, RecordingAnchor, TestApp, record_data};

#[tokio::test]
async fn test_create_without_anchor_keeps_local_digest() {
    let app = TestApp::new();
    let record = app
        .service
        .create_record(&app.official(), record_data("Sealed locally", "Finance"))
        .await
        .unwrap()
        .record;

    let digest = record.integrity.clone().expect("digest attached");
    assert_eq!(digest.hash, fingerprint(&record).unwrap());
    let receipt = digest.receipt.expect("receipt");
    assert!(!receipt.anchored);
    assert!(receipt.error.is_none());
    assert!(receipt.note.is_some());

    let stored = app.service.get_record(record.id).await.unwrap().record;
    assert_eq!(stored.integrity, record.integrity);
    assert_eq!(stored.updated_at, stored.created_at);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_anchor_times_out_without_failing_create() {
    let settings = ServiceSettings {
        anchor_timeout: Duration::from_millis(250),
        ..ServiceSettings::default()
    };
    let app = TestApp::with_anchor(Arc::new(HangingAnchor), settings);

    let response = app
        .service
        .create_record(&app.official(), record_data("Slow ledger", "Finance"))
        .await
        .unwrap();
    assert!(response.success);

    let receipt = response
        .record
        .integrity
        .and_then(|d| d.receipt)
        .expect("receipt");
    assert!(!receipt.anchored);
    assert!(receipt.error.unwrap().contains("timed out"));

    let trail = app.audit.trail(response.record.id).await.unwrap();
    assert_eq!(trail.audit_trail.len(), 1);
}

#[tokio::test]
async fn test_failing_ledger_becomes_warning() {
    let app = TestApp::with_ledger(Arc::new(FailingLedger));
    let response = app
        .service
        .create_record(&app.official(), record_data("Audit offline", "Finance"))
        .await
        .unwrap();

    assert!(response.success);
    assert!(response.is_partial());
    assert_eq!(response.warnings.len(), 1);
    assert_eq!(response.warnings[0].kind, ErrorKind::AuditWrite);

    let stored = app.service.get_record(response.record.id).await.unwrap();
    assert_eq!(stored.record.title, "Audit offline");

    let updated = app
        .service
        .update_record(
            &app.official(),
            response.record.id,
            RecordPatch::status(RecordStatus::Archived),
        )
        .await
        .unwrap();
    assert!(updated.success);
    assert_eq!(updated.warnings.len(), 1);
    assert_eq!(updated.warnings[0].kind, ErrorKind::AuditWrite);
    assert_eq!(updated.record.status, RecordStatus::Archived);
    let stored = app.service.get_record(response.record.id).await.unwrap();
    assert_eq!(stored.record.status, RecordStatus::Archived);

    let deleted = app
        .service
        .delete_record(&app.admin(), response.record.id)
        .await
        .unwrap();
    assert_eq!(deleted.warnings.len(), 1);
    assert_eq!(deleted.warnings[0].kind, ErrorKind::AuditWrite);
    assert!(app.service.get_record(response.record.id).await.is_err());
}

#[tokio::test]
async fn test_anchored_record_verifies() {
    let anchor = Arc::new(RecordingAnchor::default());
    let app = TestApp::with_anchor(anchor.clone(), ServiceSettings::default());
    let record = app
        .service
        .create_record(&app.official(), record_data("Anchored record", "Finance"))
        .await
        .unwrap()
        .record;
    assert!(record.integrity.as_ref().is_some_and(|d| d.is_anchored()));

    let report = app.service.verify_record(record.id).await.unwrap();
    assert!(report.local_match);
    assert_eq!(report.anchored_match, Some(true));

    anchor.tamper(record.id, "0000beef");
    let report = app.service.verify_record(record.id).await.unwrap();
    assert!(report.local_match);
    assert_eq!(report.anchored_match, Some(false));
}

#[tokio::test]
async fn test_digest_is_creation_time_only_by_default() {
    let app = TestApp::new();
    let record = app
        .service
        .create_record(&app.official(), record_data("Checkpointed", "Finance"))
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

    let report = app.service.verify_record(record.id).await.unwrap();
    assert!(!report.local_match);
    assert_eq!(report.stored_hash, record.integrity.map(|d| d.hash));
    assert_eq!(report.anchored_match, None);
}

#[tokio::test]
async fn test_refresh_on_update_reseals() {
    let settings = ServiceSettings {
        refresh_on_update: true,
        ..ServiceSettings::default()
    };
    let app = TestApp::with_anchor(Arc::new(RecordingAnchor::default()), settings);
    let record = app
        .service
        .create_record(&app.official(), record_data("Rolling seal", "Finance"))
        .await
        .unwrap()
        .record;
    let updated = app
        .service
        .update_record(
            &app.official(),
            record.id,
            RecordPatch::status(RecordStatus::Archived),
        )
        .await
        .unwrap()
        .record;
    assert_ne!(
        updated.integrity.as_ref().map(|d| &d.hash),
        record.integrity.as_ref().map(|d| &d.hash)
    );

    let report = app.service.verify_record(record.id).await.unwrap();
    assert!(report.local_match);
    assert_eq!(report.anchored_match, Some(true));
}

#[tokio::test]
async fn test_verify_missing_record_is_not_found() {
    let app = TestApp::new();
    let err = app
        .service
        .verify_record(RecordId::new())
        .await
        .expect_err("missing");
    assert_eq!(err.kind, ErrorKind::NotFound);
}
