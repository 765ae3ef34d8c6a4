//! Startup Entry Points
//!
//! Wires the PostgreSQL connector into the bootstrap use case. `bootstrap`
//! returns errors to the caller; `must_bootstrap` is the fail-fast variant
//! for processes that run under a supervisor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::use_cases::BootstrapDatabaseUseCase;
use crate::domain::models::bootstrap::{BootstrapConfig, Bootstrapped};
use crate::infrastructure::driven_adapters::postgres::PostgresConnector;
use crate::shared::errors::BootstrapError;

/// Run the bootstrap sequence against PostgreSQL
///
/// # Errors
///
/// Returns the `BootstrapError` that aborted the sequence.
pub async fn bootstrap(config: &BootstrapConfig) -> Result<Bootstrapped<PgPool>, BootstrapError> {
    let use_case = BootstrapDatabaseUseCase::new(Arc::new(PostgresConnector::new()));
    let Bootstrapped { pool, created } = use_case.execute(config).await?;

    Ok(Bootstrapped {
        pool: pool.into_pool(),
        created,
    })
}

/// Run the bootstrap sequence, terminating the process on any failure
pub async fn must_bootstrap(config: &BootstrapConfig) -> Bootstrapped<PgPool> {
    match bootstrap(config).await {
        Ok(bootstrapped) => bootstrapped,
        Err(err) => {
            tracing::error!(
                error = %err,
                code = err.error_code(),
                stage = %err.stage(),
                database = %config.database(),
                "Database bootstrap failed"
            );
            std::process::exit(1);
        }
    }
}
