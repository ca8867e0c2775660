//! Audit trail entities.

pub mod action;
pub mod filter;
pub mod model;

pub use action::AuditAction;
pub use filter::AuditFilter;
pub use model::{AuditEntry, CreateAuditEntry};
