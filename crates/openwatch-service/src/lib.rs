//! # openwatch-service
//!
//! Business logic for OpenWatch. [`RecordService`] turns every record
//! mutation into one authorized store change, one audit entry, and (on
//! creation) a sealed integrity digest. [`AuditService`] serves the trail.
//!
//! Services follow constructor injection: every collaborator is handed in
//! as an `Arc<dyn Trait>` at construction time.

pub mod audit;
pub mod context;
pub mod policy;
pub mod record;
pub mod response;
pub mod seed;

pub use audit::AuditService;
pub use context::RequestContext;
pub use policy::{MutationAction, can_mutate};
pub use record::{RecordService, ServiceSettings};
pub use response::{AuditTrailResponse, DeleteResponse, RecordResponse, VerificationReport};
pub use seed::{DemoActors, demo_record_id, seed_demo_records};
