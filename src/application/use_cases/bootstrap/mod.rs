//! Bootstrap Use Cases
//!
//! Use cases for provisioning the target database and handing back a ready
//! pool.

mod bootstrap_database;
mod ensure_database;
mod install_extensions;

#[cfg(test)]
mod mocks;

pub use bootstrap_database::BootstrapDatabaseUseCase;
pub use ensure_database::EnsureDatabaseUseCase;
pub use install_extensions::InstallExtensionsUseCase;

use crate::domain::models::bootstrap::BootstrapStage;

fn advance(stage: BootstrapStage) {
    tracing::debug!(stage = %stage, "Bootstrap stage reached");
}
