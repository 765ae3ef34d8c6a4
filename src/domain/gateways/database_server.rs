//! Database Server Gateway
//!
//! Abstract traits defining what the bootstrap sequence needs from the
//! database server: a short-lived administrative session and a long-lived
//! pool on the target database.

use async_trait::async_trait;

use crate::domain::models::connection_template::ConnectionTemplate;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::pool_limits::PoolLimits;
use crate::shared::errors::ServerError;

/// Session on the administrative database, used only to check for and
/// create the target database
#[async_trait]
pub trait AdminSession: Send {
    /// Check the system catalog for a database with this exact name
    async fn database_exists(&mut self, name: &Identifier) -> Result<bool, ServerError>;

    /// Issue `CREATE DATABASE` for this name
    async fn create_database(&mut self, name: &Identifier) -> Result<(), ServerError>;

    /// Release the session
    async fn close(self) -> Result<(), ServerError>;
}

/// Connection pool on the target database
#[async_trait]
pub trait TargetDatabase: Send + Sync {
    /// Issue `CREATE EXTENSION IF NOT EXISTS` for this extension
    async fn enable_extension(&self, name: &Identifier) -> Result<(), ServerError>;
}

/// Opens sessions and pools against the server
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    type Admin: AdminSession;
    type Target: TargetDatabase;

    /// Open a single connection using the administrative template
    async fn connect_admin(&self, template: &ConnectionTemplate)
        -> Result<Self::Admin, ServerError>;

    /// Open the target pool with `limits` applied
    async fn connect_target(
        &self,
        template: &ConnectionTemplate,
        limits: &PoolLimits,
    ) -> Result<Self::Target, ServerError>;
}
