//! Domain Layer
//!
//! Contains the bootstrap parameter model, connection template handling and
//! the gateway traits (ports) for the database server.
//! This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;

pub use gateways::{AdminSession, DatabaseConnector, TargetDatabase};
pub use models::bootstrap::{BootstrapConfig, BootstrapStage, Bootstrapped};
pub use models::connection_template::ConnectionTemplate;
pub use models::identifier::Identifier;
pub use models::pool_limits::PoolLimits;
