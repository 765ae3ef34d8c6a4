//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - PostgreSQL connector, admin session and target pool
//! - Configuration
//! - Cache client

pub mod cache_client;
pub mod config;
pub mod postgres;

pub use config::AppConfig;
pub use postgres::PostgresConnector;
