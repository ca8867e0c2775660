//! Integrity fingerprint and anchor receipt value objects.

pub mod model;

pub use model::{AnchorReceipt, DIGEST_ALGORITHM, IntegrityDigest};
