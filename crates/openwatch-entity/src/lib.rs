//! # openwatch-entity
//!
//! Domain entity models for OpenWatch. Every struct in this crate is a
//! stored row or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize` and `Deserialize`, and use camelCase on the wire.

pub mod audit;
pub mod integrity;
pub mod record;
pub mod user;
pub mod validation;
