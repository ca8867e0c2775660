//! Schema migrations for the PostgreSQL backend.

use sqlx::migrate::Migrator;
use tracing::info;

use openwatch_core::error::{AppError, ErrorKind};
use openwatch_core::result::AppResult;

use crate::connection::DatabasePool;

/// Embedded migrations from the workspace `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date. Returns the number of known migrations.
pub async fn run_migrations(db: &DatabasePool) -> AppResult<usize> {
    MIGRATOR.run(db.pool()).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    let count = MIGRATOR.iter().count();
    info!(migrations = count, "Schema is up to date");
    Ok(count)
}
