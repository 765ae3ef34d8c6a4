//! PostgreSQL Connector
//!
//! Opens the admin connection and the target pool.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection};

use super::admin::PostgresAdminSession;
use super::options::connect_options;
use super::pool::PoolConfigurer;
use super::target::PostgresTarget;
use crate::domain::gateways::DatabaseConnector;
use crate::domain::models::connection_template::ConnectionTemplate;
use crate::domain::models::pool_limits::PoolLimits;
use crate::shared::errors::ServerError;

/// PostgreSQL implementation of DatabaseConnector
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresConnector;

impl PostgresConnector {
    /// Create a new PostgresConnector
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseConnector for PostgresConnector {
    type Admin = PostgresAdminSession;
    type Target = PostgresTarget;

    async fn connect_admin(
        &self,
        template: &ConnectionTemplate,
    ) -> Result<Self::Admin, ServerError> {
        let options = connect_options(template)?;
        let conn = PgConnection::connect_with(&options).await?;
        tracing::info!(template = %template, "Admin connection opened");

        Ok(PostgresAdminSession::new(conn))
    }

    async fn connect_target(
        &self,
        template: &ConnectionTemplate,
        limits: &PoolLimits,
    ) -> Result<Self::Target, ServerError> {
        let options = connect_options(template)?;
        let pool = PoolConfigurer::configure(PgPoolOptions::new(), limits)
            .connect_with(options)
            .await?;
        tracing::info!(template = %template, "Target pool opened");

        Ok(PostgresTarget::new(pool))
    }
}
