//! Demo identities and records for local runs.

use uuid::Uuid;

use openwatch_core::error::ErrorKind;
use openwatch_core::result::AppResult;
use openwatch_core::types::{RecordId, UserId};
use openwatch_entity::record::{CreateRecord, Record, RecordStatus};
use openwatch_entity::user::{Actor, UserRole};

use crate::context::RequestContext;
use crate::record::RecordService;

/// The three demo users, one per role.
#[derive(Debug, Clone)]
pub struct DemoActors {
    /// Creates and edits own records.
    pub official: Actor,
    /// Full control.
    pub admin: Actor,
    /// Read only.
    pub citizen: Actor,
}

impl DemoActors {
    /// Demo users with fixed ids, so repeated runs agree on ownership.
    pub fn new() -> Self {
        Self {
            official: Actor::new(
                UserId::from_uuid(Uuid::from_u128(1)),
                "Demo Official",
                UserRole::Official,
            ),
            admin: Actor::new(
                UserId::from_uuid(Uuid::from_u128(2)),
                "Demo Admin",
                UserRole::Admin,
            ),
            citizen: Actor::new(
                UserId::from_uuid(Uuid::from_u128(3)),
                "Demo Citizen",
                UserRole::Citizen,
            ),
        }
    }
}

impl Default for DemoActors {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed id of the `n`th demo record, counting from one.
///
/// Each run of an in-memory backend reseeds, so the ids must not change
/// between runs for the CLI to address the same record twice.
pub fn demo_record_id(n: u128) -> RecordId {
    RecordId::from_uuid(Uuid::from_u128(n))
}

/// Create the demo records through the service, so each one gets its
/// audit entry and digest like any other record.
///
/// Records already present under their demo id are left alone.
pub async fn seed_demo_records(
    service: &RecordService,
    actors: &DemoActors,
) -> AppResult<Vec<Record>> {
    let official = RequestContext::new(actors.official.clone());
    let admin = RequestContext::new(actors.admin.clone());

    let seeds = [
        (
            &official,
            CreateRecord::new(
                "City Budget Allocation 2024",
                "Detailed breakdown of the city budget allocation for the fiscal year 2024, \
                 including infrastructure, education, and public safety spending.",
                "Finance",
            ),
        ),
        (
            &official,
            CreateRecord::new(
                "Public Health Initiative Report",
                "Comprehensive report on the new public health initiatives launched in \
                 response to community health needs assessment.",
                "Health",
            ),
        ),
        (
            &admin,
            CreateRecord::new(
                "Transportation Infrastructure Plan",
                "Long-term plan for improving city transportation infrastructure, including \
                 road maintenance and public transit expansion.",
                "Transportation",
            )
            .with_status(RecordStatus::UnderReview),
        ),
    ];

    let mut created = Vec::with_capacity(seeds.len());
    for (n, (ctx, data)) in (1..).zip(seeds) {
        let id = demo_record_id(n);
        let response = match service.get_record(id).await {
            Ok(existing) => existing,
            Err(e) if e.is(ErrorKind::NotFound) => {
                service.create_record_with_id(ctx, id, data).await?
            }
            Err(e) => return Err(e),
        };
        created.push(response.record);
    }
    Ok(created)
}
