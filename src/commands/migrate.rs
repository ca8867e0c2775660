//! Schema migration command.

use openwatch_core::config::{AppConfig, DatabaseBackend};
use openwatch_core::result::AppResult;
use openwatch_database::DatabasePool;
use openwatch_database::migration::run_migrations;

/// Apply pending migrations to the configured PostgreSQL database.
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    if config.database.backend != DatabaseBackend::Postgres {
        eprintln!("⚠ database.backend is not \"postgres\"; nothing to migrate");
        return Ok(());
    }

    let db = DatabasePool::connect(&config.database).await?;
    db.ping().await?;
    let count = run_migrations(&db).await?;
    db.close().await;
    println!("✓ Schema up to date ({count} migrations known)");
    Ok(())
}
