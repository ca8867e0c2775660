//! Process-local implementations of the storage contracts.

pub mod audit;
pub mod record;

pub use audit::MemoryAuditLedger;
pub use record::MemoryRecordStore;
