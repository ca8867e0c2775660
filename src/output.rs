//! JSON output for CLI commands.

use serde::Serialize;

use openwatch_core::error::AppError;
use openwatch_core::types::{ApiErrorResponse, OperationWarning};

/// Print any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("✗ Failed to render output: {e}"),
    }
}

/// Print a titled section followed by its JSON body.
pub fn print_section<T: Serialize>(title: &str, value: &T) {
    println!("── {title}");
    print_json(value);
}

/// Print non-fatal warnings attached to a successful operation.
pub fn print_warnings(warnings: &[OperationWarning]) {
    for warning in warnings {
        eprintln!("⚠ [{}] {}", warning.kind, warning.message);
    }
}

/// Print an error in the standard error envelope.
pub fn print_error(err: &AppError) {
    eprintln!("✗ {err}");
    if let Ok(json) = serde_json::to_string_pretty(&ApiErrorResponse::from(err)) {
        eprintln!("{json}");
    }
}
