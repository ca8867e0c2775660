//! Anchor used when no external ledger is configured.

use async_trait::async_trait;

use openwatch_core::result::AppResult;
use openwatch_core::types::RecordId;
use openwatch_entity::integrity::AnchorReceipt;

use super::IntegrityAnchor;

/// Note attached to every receipt from the no-op anchor.
pub const NOT_CONFIGURED_NOTE: &str = "Integrity anchor not configured, using local hash only";

/// Accepts nothing, stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnchor;

#[async_trait]
impl IntegrityAnchor for NoopAnchor {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn anchor(&self, _record_id: RecordId, _digest: &str) -> AnchorReceipt {
        AnchorReceipt::skipped(NOT_CONFIGURED_NOTE)
    }

    async fn fetch(&self, _record_id: RecordId) -> AppResult<Option<String>> {
        Ok(None)
    }
}
