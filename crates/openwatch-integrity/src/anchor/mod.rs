//! The integrity anchor capability.
//!
//! An anchor writes a record fingerprint to an external, independently
//! verifiable ledger. It is optional infrastructure: failures are reported
//! in the returned [`AnchorReceipt`], never as an error of the mutation
//! that triggered them.

pub mod ledger;
pub mod noop;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use openwatch_core::config::AnchorConfig;
use openwatch_core::result::AppResult;
use openwatch_core::types::RecordId;
use openwatch_entity::integrity::AnchorReceipt;

pub use ledger::LedgerAnchor;
pub use noop::NoopAnchor;

/// Pluggable sink for record fingerprints.
#[async_trait]
pub trait IntegrityAnchor: Send + Sync + std::fmt::Debug + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this anchor talks to a real ledger.
    fn is_configured(&self) -> bool {
        true
    }

    /// Externalize `digest` for `record_id`.
    ///
    /// Never fails: problems are carried in the receipt's `error` field.
    async fn anchor(&self, record_id: RecordId, digest: &str) -> AnchorReceipt;

    /// Fetch the digest currently anchored for `record_id`.
    async fn fetch(&self, record_id: RecordId) -> AppResult<Option<String>>;

    /// Whether the anchored digest equals `expected`.
    ///
    /// Any lookup failure counts as a mismatch.
    async fn verify(&self, record_id: RecordId, expected: &str) -> bool {
        match self.fetch(record_id).await {
            Ok(Some(anchored)) => digests_equal(&anchored, expected),
            Ok(None) => false,
            Err(e) => {
                warn!(
                    record_id = %record_id,
                    anchor = self.name(),
                    error = %e,
                    "Anchored digest lookup failed"
                );
                false
            }
        }
    }
}

/// Compare hex digests ignoring case and an optional `0x` prefix.
pub(crate) fn digests_equal(a: &str, b: &str) -> bool {
    fn normalize(s: &str) -> &str {
        s.strip_prefix("0x").unwrap_or(s)
    }
    normalize(a).eq_ignore_ascii_case(normalize(b))
}

/// Pick the anchor implementation for the given settings.
///
/// Falls back to [`NoopAnchor`] when the settings are incomplete or the
/// HTTP client cannot be built.
pub fn build_anchor(config: &AnchorConfig) -> Arc<dyn IntegrityAnchor> {
    if !config.is_configured() {
        info!("Integrity anchor not configured, digests stay local");
        return Arc::new(NoopAnchor);
    }
    match LedgerAnchor::from_config(config) {
        Ok(anchor) => {
            info!(
                endpoint = anchor.endpoint(),
                timeout_ms = config.timeout_ms,
                "Integrity anchor enabled"
            );
            Arc::new(anchor)
        }
        Err(e) => {
            warn!(error = %e, "Integrity anchor unavailable, digests stay local");
            Arc::new(NoopAnchor)
        }
    }
}
