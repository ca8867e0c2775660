//! Convenience result type alias for OpenWatch.

use crate::error::AppError;

/// A specialized `Result` type for OpenWatch operations.
pub type AppResult<T> = Result<T, AppError>;
