//! Input validation helpers shared by entity field sets.

use validator::{ValidationError, ValidationErrors};

use openwatch_core::error::{AppError, FieldError};

/// Reject values that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Convert `validator` output into an [`AppError`] naming every failing field.
///
/// Fields are reported in name order; repeated messages for the same field
/// are collapsed.
pub fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<FieldError> = Vec::new();
    let mut by_field: Vec<_> = errors.field_errors().into_iter().collect();
    by_field.sort_by(|a, b| a.0.cmp(&b.0));

    for (field, failures) in by_field {
        for failure in failures {
            let message = failure
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("failed '{}' check", failure.code));
            if !fields
                .iter()
                .any(|f| f.field == field.as_ref() && f.message == message)
            {
                fields.push(FieldError::new(field.as_ref(), message));
            }
        }
    }

    AppError::validation_fields(fields)
}
