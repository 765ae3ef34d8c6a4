//! Domain Models
//!
//! Core domain entities and value objects.

pub mod bootstrap;
pub mod connection_template;
pub mod identifier;
pub mod pool_limits;
pub mod statements;
