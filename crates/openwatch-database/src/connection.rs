//! PostgreSQL connection pool for the durable backend.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use openwatch_core::config::DatabaseConfig;
use openwatch_core::error::{AppError, ErrorKind};
use openwatch_core::result::AppResult;

/// Shared handle to the PostgreSQL pool used by both stores.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open a pool using the `[database]` settings.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }

        info!(
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            "Opening PostgreSQL pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Cannot reach PostgreSQL: {e}"),
                    e,
                )
            })?;

        Ok(Self { pool })
    }

    /// Borrow the sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "PostgreSQL ping failed", e))
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

/// Hide the password in a connection URL before it reaches the logs.
fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|p| p + 3) else {
        return url.to_string();
    };
    let Some(at) = url[scheme_end..].find('@').map(|p| p + scheme_end) else {
        return url.to_string();
    };
    match url[scheme_end..at].find(':') {
        Some(colon) => format!("{}:****{}", &url[..scheme_end + colon], &url[at..]),
        None => url.to_string(),
    }
}
