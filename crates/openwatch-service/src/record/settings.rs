//! Tunables the record service reads from configuration.

use std::time::Duration;

use openwatch_core::config::AppConfig;

/// Runtime settings for [`RecordService`](super::RecordService).
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Upper bound on a single anchor call.
    pub anchor_timeout: Duration,
    /// Re-seal records after every successful update.
    pub refresh_on_update: bool,
    /// Page size when the caller supplies none.
    pub default_page_size: u64,
    /// Audit placeholder for a missing client address.
    pub default_ip_address: String,
    /// Audit placeholder for a missing user agent.
    pub default_user_agent: String,
}

impl ServiceSettings {
    /// Extract the service settings from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            anchor_timeout: config.anchor.timeout(),
            refresh_on_update: config.integrity.refresh_on_update,
            default_page_size: config.records.default_page_size,
            default_ip_address: config.audit.default_ip_address.clone(),
            default_user_agent: config.audit.default_user_agent.clone(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
