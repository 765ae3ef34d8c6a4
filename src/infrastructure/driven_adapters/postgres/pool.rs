//! Pool Configurer
//!
//! sqlx fixes pool limits when the pool is built, so the limits are applied
//! to the pool options right before the target pool opens.

use sqlx::postgres::PgPoolOptions;

use crate::domain::models::pool_limits::PoolLimits;

/// Applies `PoolLimits` to pool options
#[derive(Debug, Default, Clone, Copy)]
pub struct PoolConfigurer;

impl PoolConfigurer {
    /// Apply idle/open limits and lifetime. Unset (zero or negative) limits
    /// keep sqlx's defaults, except lifetime which becomes unlimited.
    #[must_use]
    pub fn configure(options: PgPoolOptions, limits: &PoolLimits) -> PgPoolOptions {
        let mut options = options;

        if let Some(max_open) = limits.max_open() {
            options = options.max_connections(max_open);
        }

        // Warm connections can never exceed the pool size
        let max_idle = limits
            .max_idle()
            .map_or(0, |idle| idle.min(options.get_max_connections()));
        options = options.min_connections(max_idle);

        let options = options.max_lifetime(limits.max_lifetime());

        tracing::debug!(
            max_connections = options.get_max_connections(),
            min_connections = options.get_min_connections(),
            max_lifetime = ?options.get_max_lifetime(),
            "Pool limits applied"
        );

        options
    }
}
