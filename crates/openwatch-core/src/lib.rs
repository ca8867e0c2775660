//! # openwatch-core
//!
//! Core crate for OpenWatch. Contains configuration schemas, typed
//! identifiers, pagination and response envelopes, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other OpenWatch crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind, FieldError};
pub use result::AppResult;
