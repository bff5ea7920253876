//! PostgreSQL pool setup and error mapping shared by the Postgres adapters.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use stationdesk_core::{AppError, AppResult};

/// Connection settings for the PostgreSQL pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresPoolConfig {
    /// Connection string.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Time a caller waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

/// Connects the pool and applies pending migrations.
pub async fn connect_and_migrate(config: &PostgresPoolConfig) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .map_err(|error| storage_error(error, "connect to database"))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

/// Maps a sqlx error into the application taxonomy.
///
/// Pool exhaustion, closed pools and I/O failures are retryable and map to
/// [`AppError::Unavailable`]. Unique violations map to [`AppError::Conflict`].
pub(crate) fn storage_error(error: sqlx::Error, operation: &str) -> AppError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::Unavailable(format!("failed to {operation}: {error}"))
        }
        sqlx::Error::Database(ref database_error)
            if database_error.code().as_deref() == Some("23505") =>
        {
            AppError::Conflict(format!("failed to {operation}: record already exists"))
        }
        other => AppError::Internal(format!("failed to {operation}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use stationdesk_core::AppError;

    use super::storage_error;

    #[test]
    fn pool_timeouts_are_retryable() {
        let error = storage_error(sqlx::Error::PoolTimedOut, "load grant matrix");
        assert!(matches!(error, AppError::Unavailable(_)));
        assert!(error.is_retryable());
    }

    #[test]
    fn decode_failures_are_internal() {
        let error = storage_error(sqlx::Error::RowNotFound, "load grant matrix");
        assert!(matches!(error, AppError::Internal(_)));
    }
}
