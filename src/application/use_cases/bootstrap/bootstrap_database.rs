//! Bootstrap Database Use Case
//!
//! Sequences the whole startup: admin session, existence check and creation,
//! admin release, target pool, extensions. This is the only component that
//! knows the full order.
//!
//! Nothing here retries or times out. A stalled server blocks the caller
//! until the driver gives up; supervision is the embedding process's job.

use std::sync::Arc;

use super::advance;
use super::ensure_database::EnsureDatabaseUseCase;
use super::install_extensions::InstallExtensionsUseCase;
use crate::domain::gateways::{AdminSession, DatabaseConnector};
use crate::domain::models::bootstrap::{BootstrapConfig, BootstrapStage, Bootstrapped};
use crate::shared::errors::{BootstrapError, ConnectionRole};

/// Use case running the full bootstrap sequence
pub struct BootstrapDatabaseUseCase<C: DatabaseConnector> {
    connector: Arc<C>,
    ensure_database: EnsureDatabaseUseCase,
    install_extensions: InstallExtensionsUseCase,
}

impl<C: DatabaseConnector> BootstrapDatabaseUseCase<C> {
    /// Create a new BootstrapDatabaseUseCase
    #[must_use]
    pub fn new(connector: Arc<C>) -> Self {
        Self {
            connector,
            ensure_database: EnsureDatabaseUseCase::new(),
            install_extensions: InstallExtensionsUseCase::new(),
        }
    }

    /// Execute the use case
    ///
    /// The target pool is only opened once the database is known to exist,
    /// and only after the admin session has been released.
    ///
    /// # Errors
    ///
    /// Returns the first `BootstrapError` hit; the sequence does not continue
    /// past it. Extensions enabled before a failure remain enabled.
    pub async fn execute(
        &self,
        config: &BootstrapConfig,
    ) -> Result<Bootstrapped<C::Target>, BootstrapError> {
        let database = config.database();
        tracing::info!(
            database = %database,
            template = %config.admin_template(),
            "Bootstrapping database"
        );

        let created = self.provision(config).await?;

        // Limits are fixed when the pool is built, so connecting and
        // configuring complete together
        let target_template = config.target_template();
        let limits = config.pool_limits();
        let pool = self
            .connector
            .connect_target(&target_template, limits)
            .await
            .map_err(|source| BootstrapError::Connection {
                role: ConnectionRole::Target,
                database: database.to_string(),
                source,
            })?;
        tracing::debug!(
            stage = %BootstrapStage::PoolConfigured,
            from = %BootstrapStage::TargetConnected,
            max_open = limits.max_open,
            max_idle = limits.max_idle,
            max_lifetime_secs = limits.max_lifetime_secs,
            "Target pool opened with limits applied"
        );

        self.install_extensions
            .execute(&pool, config.extensions())
            .await?;
        advance(BootstrapStage::ExtensionsInstalled);

        tracing::info!(
            database = %database,
            created,
            extensions = config.extensions().len(),
            stage = %BootstrapStage::Ready,
            "Database bootstrap complete"
        );

        Ok(Bootstrapped { pool, created })
    }

    /// Admin-session scope. The session is closed on every path out of the
    /// existence check and creation, before their result is looked at.
    async fn provision(&self, config: &BootstrapConfig) -> Result<bool, BootstrapError> {
        let template = config.admin_template();
        let mut session = self
            .connector
            .connect_admin(template)
            .await
            .map_err(|source| BootstrapError::Connection {
                role: ConnectionRole::Admin,
                database: template.database().to_string(),
                source,
            })?;
        advance(BootstrapStage::AdminConnected);

        let outcome = self
            .ensure_database
            .execute(&mut session, config.database())
            .await;

        if let Err(err) = session.close().await {
            tracing::warn!(error = %err, "Failed to close admin connection cleanly");
        }
        advance(BootstrapStage::AdminClosed);

        outcome
    }
}
