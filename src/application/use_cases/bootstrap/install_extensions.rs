//! Install Extensions Use Case
//!
//! Enables server extensions on the target database, one at a time and in
//! the configured order. Extensions may depend on earlier ones, so the first
//! failure stops the run. Already-enabled extensions are left in place;
//! `IF NOT EXISTS` makes a rerun safe.

use crate::domain::gateways::TargetDatabase;
use crate::domain::models::identifier::Identifier;
use crate::shared::errors::BootstrapError;

/// Use case for enabling extensions on the target database
#[derive(Debug, Default, Clone, Copy)]
pub struct InstallExtensionsUseCase;

impl InstallExtensionsUseCase {
    /// Create a new InstallExtensionsUseCase
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute the use case
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError::Extension` for the first extension that could
    /// not be enabled; later extensions are not attempted.
    pub async fn execute<T: TargetDatabase>(
        &self,
        target: &T,
        extensions: &[Identifier],
    ) -> Result<(), BootstrapError> {
        for extension in extensions {
            tracing::info!(extension = %extension, "Enabling extension");
            target
                .enable_extension(extension)
                .await
                .map_err(|source| BootstrapError::Extension {
                    extension: extension.to_string(),
                    source,
                })?;
        }

        Ok(())
    }
}
