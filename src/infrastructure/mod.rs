//! Infrastructure Layer
//!
//! Contains all external concerns: the PostgreSQL connector, configuration
//! loading and the cache client builder.

pub mod driven_adapters;
