//! Ensure Database Use Case
//!
//! Guarantees the target database exists, creating it through the admin
//! session when the catalog has no entry for it.

use super::advance;
use crate::domain::gateways::AdminSession;
use crate::domain::models::bootstrap::BootstrapStage;
use crate::domain::models::identifier::Identifier;
use crate::shared::errors::BootstrapError;

/// Use case for checking and creating the target database
#[derive(Debug, Default, Clone, Copy)]
pub struct EnsureDatabaseUseCase;

impl EnsureDatabaseUseCase {
    /// Create a new EnsureDatabaseUseCase
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute the use case. Returns `true` if the database was created by
    /// this call, `false` if it already existed.
    ///
    /// Database creation is not transactional on PostgreSQL, so nothing here
    /// is wrapped in a transaction.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::ExistenceCheck` if the catalog query fails.
    /// Returns `BootstrapError::Creation` if `CREATE DATABASE` fails.
    pub async fn execute<S: AdminSession>(
        &self,
        session: &mut S,
        name: &Identifier,
    ) -> Result<bool, BootstrapError> {
        tracing::debug!(database = %name, "Checking whether database exists");

        let exists = session
            .database_exists(name)
            .await
            .map_err(|source| BootstrapError::ExistenceCheck {
                database: name.to_string(),
                source,
            })?;
        advance(BootstrapStage::DatabaseChecked);

        if exists {
            tracing::info!(database = %name, "Database already exists");
            advance(BootstrapStage::AlreadyExists);
            return Ok(false);
        }

        session
            .create_database(name)
            .await
            .map_err(|source| BootstrapError::Creation {
                database: name.to_string(),
                source,
            })?;

        tracing::info!(database = %name, "Database created");
        advance(BootstrapStage::Created);
        Ok(true)
    }
}
