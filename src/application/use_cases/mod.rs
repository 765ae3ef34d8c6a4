//! Use Cases
//!
//! Application use cases that orchestrate domain logic.

pub mod bootstrap;

pub use bootstrap::{BootstrapDatabaseUseCase, EnsureDatabaseUseCase, InstallExtensionsUseCase};
