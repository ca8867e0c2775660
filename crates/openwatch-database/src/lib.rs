//! # openwatch-database
//!
//! The persistence collaborator for OpenWatch: the [`RecordStore`] and
//! [`AuditLedger`] contracts, an in-memory implementation of each, and
//! PostgreSQL implementations with connection management and migrations.

pub mod backend;
pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use backend::Stores;
pub use connection::DatabasePool;
pub use memory::{MemoryAuditLedger, MemoryRecordStore};
pub use postgres::{PgAuditLedger, PgRecordStore};
pub use store::{AuditLedger, RecordStore};
