//! Database Bootstrap
//!
//! Guarantees a PostgreSQL application database exists, then opens a tuned
//! connection pool on it with the required extensions enabled. Structured
//! after Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod startup;

pub use startup::{bootstrap, must_bootstrap};
