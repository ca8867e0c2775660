//! Record listing and audit ledger configuration.

use serde::{Deserialize, Serialize};

/// Record listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// Page size used when the caller does not supply one.
    #[serde(default = "default_record_page_size")]
    pub default_page_size: u64,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_record_page_size(),
        }
    }
}

/// Audit ledger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Page size used when the caller does not supply one.
    #[serde(default = "default_audit_page_size")]
    pub default_page_size: u64,
    /// Placeholder recorded when the transport supplied no client address.
    #[serde(default = "default_ip_address")]
    pub default_ip_address: String,
    /// Placeholder recorded when the transport supplied no user agent.
    #[serde(default = "default_user_agent")]
    pub default_user_agent: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_audit_page_size(),
            default_ip_address: default_ip_address(),
            default_user_agent: default_user_agent(),
        }
    }
}

fn default_record_page_size() -> u64 {
    20
}

fn default_audit_page_size() -> u64 {
    50
}

fn default_ip_address() -> String {
    "127.0.0.1".to_string()
}

fn default_user_agent() -> String {
    "OpenWatch/1.0".to_string()
}
