//! Record lifecycle orchestration.

pub mod service;
pub mod settings;

pub use service::RecordService;
pub use settings::ServiceSettings;
