//! Admin Session
//!
//! A single connection to the administrative database, used to look the
//! target database up in `pg_database` and create it.

use async_trait::async_trait;
use sqlx::{Connection, Executor, PgConnection};

use crate::domain::gateways::AdminSession;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::statements;
use crate::shared::errors::ServerError;

/// PostgreSQL implementation of AdminSession
pub struct PostgresAdminSession {
    conn: PgConnection,
}

impl PostgresAdminSession {
    /// Wrap an open connection
    #[must_use]
    pub fn new(conn: PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl AdminSession for PostgresAdminSession {
    async fn database_exists(&mut self, name: &Identifier) -> Result<bool, ServerError> {
        let exists = sqlx::query_scalar::<_, bool>(statements::DATABASE_EXISTS_QUERY)
            .bind(name.as_str())
            .fetch_one(&mut self.conn)
            .await?;

        Ok(exists)
    }

    async fn create_database(&mut self, name: &Identifier) -> Result<(), ServerError> {
        let statement = statements::create_database(name);
        tracing::info!(statement = %statement, "Creating database");

        // Simple-query protocol, same as sqlx's own database creation
        (&mut self.conn).execute(statement.as_str()).await?;

        Ok(())
    }

    async fn close(self) -> Result<(), ServerError> {
        self.conn.close().await?;
        tracing::debug!("Admin connection closed");
        Ok(())
    }
}
