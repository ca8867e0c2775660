//! PostgreSQL implementations of the storage contracts.

pub mod audit;
pub mod record;

pub use audit::PgAuditLedger;
pub use record::PgRecordStore;

use chrono::{DateTime, SubsecRound, Utc};

use openwatch_core::error::{AppError, ErrorKind};

/// `TIMESTAMPTZ` keeps microseconds, so values are truncated before they are
/// written to keep in-process copies equal to what a later read returns.
pub(crate) fn db_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Wrap a sqlx failure with a short context message.
pub(crate) fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
