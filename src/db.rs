//! Connection pool setup and the error type shared by every repository.

use std::future::Future;
use std::time::Duration;

use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{error, info};

use carebook_config::DatabaseConfig;
use carebook_core::AppError;

/// Upper bound for a single repository call made on behalf of a request.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Backend(other.to_string()),
        }
    }
}

impl RepositoryError {
    /// Maps to a 404 naming `entity`, or a 500 carrying `failure` for backend
    /// errors. Backend details go to the log only.
    pub fn into_app_error(self, entity: &str, failure: &str) -> AppError {
        match self {
            Self::NotFound => AppError::not_found(anyhow!("{} not found", entity)),
            Self::Backend(detail) => {
                error!(error = %detail, "{}", failure);
                AppError::internal(anyhow!("{}", failure))
            }
        }
    }
}

/// Runs a repository future with [`QUERY_TIMEOUT`]; hitting the limit counts
/// as a backend failure.
pub async fn bounded<T, F>(fut: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(QUERY_TIMEOUT, fut)
        .await
        .unwrap_or_else(|_| Err(RepositoryError::Backend("query timed out".to_string())))
}

pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(QUERY_TIMEOUT)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("migrations applied");
    Ok(())
}
