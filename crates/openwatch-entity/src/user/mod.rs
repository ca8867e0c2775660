//! Actor identity and roles.

pub mod actor;
pub mod role;

pub use actor::Actor;
pub use role::UserRole;
