//! PostgreSQL Adapters
//!
//! sqlx-backed implementations of the database server gateways.

mod admin;
mod connector;
mod options;
mod pool;
mod target;

pub use admin::PostgresAdminSession;
pub use connector::PostgresConnector;
pub use options::connect_options;
pub use pool::PoolConfigurer;
pub use target::PostgresTarget;
