//! End-to-end walkthrough of the record lifecycle.

use openwatch_core::result::AppResult;
use openwatch_core::types::ApiErrorResponse;
use openwatch_entity::record::{CreateRecord, RecordFilter, RecordPatch, RecordStatus};
use openwatch_service::{RequestContext, seed_demo_records};

use super::App;
use crate::output;

/// Create, update, attempt a forbidden edit, delete, then show the trail.
pub async fn execute(app: &App) -> AppResult<()> {
    if !app.is_ephemeral() {
        seed_demo_records(&app.records, &app.actors).await?;
    }

    let official = RequestContext::new(app.actors.official.clone())
        .with_ip_address("192.0.2.10")
        .with_user_agent("openwatch-cli/demo");
    let admin = RequestContext::new(app.actors.admin.clone());
    let citizen = RequestContext::new(app.actors.citizen.clone());

    let created = app
        .records
        .create_record(
            &official,
            CreateRecord::new(
                "Community Park Renovation",
                "Scope, contractors and budget for the riverside park renovation.",
                "Parks",
            ),
        )
        .await?;
    output::print_warnings(&created.warnings);
    output::print_section("Created", &created);
    let id = created.record.id;

    let updated = app
        .records
        .update_record(
            &official,
            id,
            RecordPatch::status(RecordStatus::UnderReview),
        )
        .await?;
    output::print_warnings(&updated.warnings);
    output::print_section("Updated by owner", &updated);

    match app
        .records
        .update_record(&citizen, id, RecordPatch::status(RecordStatus::Archived))
        .await
    {
        Ok(_) => output::print_section("Unexpectedly allowed", &id),
        Err(e) => output::print_section("Citizen update rejected", &ApiErrorResponse::from(&e)),
    }

    let report = app.records.verify_record(id).await?;
    output::print_section("Verification after update", &report);

    let deleted = app.records.delete_record(&admin, id).await?;
    output::print_warnings(&deleted.warnings);
    output::print_section("Deleted by admin", &deleted);

    let trail = app.audit.trail(id).await?;
    output::print_section("Audit trail", &trail);

    let remaining = app
        .records
        .list_records(&RecordFilter::default(), app.records.page_request(None, None))
        .await?;
    output::print_section("Remaining records", &remaining);
    Ok(())
}
