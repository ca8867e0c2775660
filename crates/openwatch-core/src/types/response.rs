//! Response fragments shared by every transport binding.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind, FieldError};

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Every failing field, for validation errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<&AppError> for ApiErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            error: err.kind,
            message: err.message.clone(),
            errors: err.field_errors.clone(),
        }
    }
}

/// A non-fatal problem attached to an otherwise successful operation.
///
/// Used to surface an audit ledger failure to operators after the record
/// mutation has already been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationWarning {
    /// The error category.
    pub kind: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl From<&AppError> for OperationWarning {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind,
            message: err.message.clone(),
        }
    }
}
