//! # openwatch-integrity
//!
//! Tamper evidence for public records: a deterministic SHA-256 fingerprint
//! over a record's semantic fields, and the optional [`IntegrityAnchor`]
//! capability that writes fingerprints to an external ledger.

pub mod anchor;
pub mod fingerprint;

pub use anchor::{IntegrityAnchor, LedgerAnchor, NoopAnchor, build_anchor};
pub use fingerprint::{digest_for, fingerprint};
