//! Public record domain entities.

pub mod filter;
pub mod model;
pub mod status;

pub use filter::RecordFilter;
pub use model::{CreateRecord, Record, RecordChange, RecordPatch};
pub use status::RecordStatus;
