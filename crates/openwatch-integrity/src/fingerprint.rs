//! Deterministic record fingerprints.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use openwatch_core::result::AppResult;
use openwatch_core::types::{RecordId, UserId};
use openwatch_entity::integrity::IntegrityDigest;
use openwatch_entity::record::{Record, RecordStatus};

/// The hashed projection of a record.
///
/// Field order here is the serialization order. `updatedAt`, editor
/// metadata and the digest itself are excluded.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Canonical<'a> {
    id: RecordId,
    title: &'a str,
    description: &'a str,
    department: &'a str,
    status: RecordStatus,
    created_at: String,
    created_by: UserId,
}

/// Lowercase hex SHA-256 over the canonical JSON form of `record`.
pub fn fingerprint(record: &Record) -> AppResult<String> {
    let canonical = Canonical {
        id: record.id,
        title: &record.title,
        description: &record.description,
        department: &record.department,
        status: record.status,
        created_at: record
            .created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true),
        created_by: record.created_by,
    };
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Fingerprint `record` into an unanchored digest stamped with the current time.
pub fn digest_for(record: &Record) -> AppResult<IntegrityDigest> {
    Ok(IntegrityDigest::new(fingerprint(record)?, Utc::now()))
}
