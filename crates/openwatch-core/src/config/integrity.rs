//! Integrity fingerprinting and external anchor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the external integrity ledger.
///
/// Anchoring is enabled only when `endpoint`, `credential` and
/// `contract_address` are all present and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Base URL of the ledger gateway.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer credential presented to the gateway.
    #[serde(default)]
    pub credential: Option<String>,
    /// Target contract or ledger address digests are written to.
    #[serde(default)]
    pub contract_address: Option<String>,
    /// Upper bound for a single anchor call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl AnchorConfig {
    /// Whether all three connection settings are present.
    pub fn is_configured(&self) -> bool {
        [&self.endpoint, &self.credential, &self.contract_address]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// The anchor call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            contract_address: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Fingerprinting behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityConfig {
    /// Recompute and anchor a digest after every successful update.
    ///
    /// Off by default: digests are a creation-time checkpoint only.
    #[serde(default)]
    pub refresh_on_update: bool,
}

fn default_timeout_ms() -> u64 {
    5000
}
