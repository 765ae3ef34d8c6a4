//! Target Database Pool

use async_trait::async_trait;
use sqlx::{Executor, PgPool};

use crate::domain::gateways::TargetDatabase;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::statements;
use crate::shared::errors::ServerError;

/// PostgreSQL implementation of TargetDatabase, wrapping the application pool
#[derive(Debug, Clone)]
pub struct PostgresTarget {
    pool: PgPool,
}

impl PostgresTarget {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Hand the pool over to the caller
    #[must_use]
    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

#[async_trait]
impl TargetDatabase for PostgresTarget {
    async fn enable_extension(&self, name: &Identifier) -> Result<(), ServerError> {
        let statement = statements::create_extension(name);
        tracing::info!(statement = %statement, "Executing");

        self.pool.execute(statement.as_str()).await?;

        Ok(())
    }
}
