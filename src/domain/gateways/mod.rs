//! Gateway Traits (Ports)
//!
//! Abstract interfaces defining contracts for external dependencies.
//! These are implemented by driven adapters in the infrastructure layer.

pub mod database_server;

pub use database_server::{AdminSession, DatabaseConnector, TargetDatabase};
