//! Concurrent mutations against the shared stores.

mod helpers;

use std::collections::HashSet;
use std::sync::Arc;

use openwatch_entity::audit::AuditAction;
use openwatch_entity::record::RecordPatch;

use helpers::{TestApp, record_data};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_not_lost() {
    let app = Arc::new(TestApp::new());
    let record = app
        .service
        .create_record(&app.official(), record_data("Contended record", "Finance"))
        .await
        .unwrap()
        .record;

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let patch = RecordPatch {
                title: Some(format!("Contended title {i:02}")),
                ..RecordPatch::default()
            };
            app.service
                .update_record(&app.admin(), record.id, patch)
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let trail = app.audit.trail(record.id).await.unwrap().audit_trail;
    let updates: Vec<_> = trail
        .iter()
        .filter(|e| e.action == AuditAction::Update)
        .collect();
    assert_eq!(updates.len(), 20);

    // Each update saw a distinct predecessor: no two read the same state.
    let predecessors: HashSet<String> = updates
        .iter()
        .map(|e| e.previous_data.as_ref().unwrap()["title"].to_string())
        .collect();
    assert_eq!(predecessors.len(), 20);

    let ids: HashSet<_> = trail.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), trail.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_each_get_one_entry() {
    let app = Arc::new(TestApp::new());
    let mut handles = Vec::new();
    for i in 0..30 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.service
                .create_record(&app.official(), record_data(&format!("Parallel {i:02}"), "Finance"))
                .await
                .unwrap()
                .record
                .id
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 30);

    let entries = app.all_entries().await;
    assert_eq!(entries.len(), 30);
    for pair in entries.windows(2) {
        assert!(pair[0].timestamp > pair[1].timestamp);
    }
}
