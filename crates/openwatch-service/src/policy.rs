//! Mutation policy.
//!
//! Every role and ownership rule for record mutations lives here. Reads of
//! records and per-record audit trails are public and never consult it.

use std::fmt;

use openwatch_core::error::AppError;
use openwatch_core::result::AppResult;
use openwatch_entity::record::Record;
use openwatch_entity::user::{Actor, UserRole};

/// A state-changing operation on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    /// absent → any status.
    Create,
    /// Field edits and status transitions.
    Update,
    /// any status → absent.
    Delete,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Whether `actor` may perform `action`.
///
/// With `record` absent only the role is checked; the ownership half of
/// the update rule is applied once the target is known.
pub fn can_mutate(actor: &Actor, record: Option<&Record>, action: MutationAction) -> bool {
    match (action, actor.role) {
        (_, UserRole::Citizen) => false,
        (MutationAction::Create, _) => true,
        (MutationAction::Update, UserRole::Admin) => true,
        (MutationAction::Update, UserRole::Official) => {
            record.is_none_or(|r| r.created_by == actor.id)
        }
        (MutationAction::Delete, role) => role == UserRole::Admin,
    }
}

/// [`can_mutate`] as a `Forbidden` error.
pub fn authorize(actor: &Actor, record: Option<&Record>, action: MutationAction) -> AppResult<()> {
    if can_mutate(actor, record, action) {
        return Ok(());
    }
    let owns_nothing = action == MutationAction::Update && actor.role == UserRole::Official;
    if owns_nothing {
        Err(AppError::forbidden("You can only update your own records"))
    } else {
        Err(AppError::forbidden(format!(
            "Insufficient permissions: role '{}' cannot {action} records",
            actor.role
        )))
    }
}

/// Whether `actor` may read the system-wide audit log.
pub fn can_view_system_audit(actor: &Actor) -> bool {
    actor.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use openwatch_core::ErrorKind;
    use openwatch_core::types::{RecordId, UserId};
    use openwatch_entity::record::CreateRecord;

    fn actor(role: UserRole) -> Actor {
        Actor::new(UserId::new(), format!("Demo {role}"), role)
    }

    fn owned_by(owner: &Actor) -> Record {
        Record::new(
            RecordId::new(),
            CreateRecord::new("Owned record", "Owned record description.", "Finance"),
            owner,
            Utc::now(),
        )
    }

    #[test]
    fn test_citizen_cannot_mutate() {
        let citizen = actor(UserRole::Citizen);
        let record = owned_by(&citizen);
        for action in [
            MutationAction::Create,
            MutationAction::Update,
            MutationAction::Delete,
        ] {
            assert!(!can_mutate(&citizen, Some(&record), action));
            assert!(!can_mutate(&citizen, None, action));
        }
    }

    #[test]
    fn test_official_updates_only_own_records() {
        let official = actor(UserRole::Official);
        let colleague = actor(UserRole::Official);
        assert!(can_mutate(&official, None, MutationAction::Create));
        assert!(can_mutate(
            &official,
            Some(&owned_by(&official)),
            MutationAction::Update
        ));

        let err = authorize(
            &official,
            Some(&owned_by(&colleague)),
            MutationAction::Update,
        )
        .expect_err("not the owner");
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "You can only update your own records");
    }

    #[test]
    fn test_only_admin_deletes() {
        let official = actor(UserRole::Official);
        let admin = actor(UserRole::Admin);
        let record = owned_by(&official);
        assert!(!can_mutate(&official, Some(&record), MutationAction::Delete));
        assert!(can_mutate(&admin, Some(&record), MutationAction::Delete));
        assert!(can_mutate(&admin, Some(&record), MutationAction::Update));
    }

    #[test]
    fn test_system_audit_is_admin_only() {
        assert!(can_view_system_audit(&actor(UserRole::Admin)));
        assert!(!can_view_system_audit(&actor(UserRole::Official)));
        assert!(!can_view_system_audit(&actor(UserRole::Citizen)));
    }
}
