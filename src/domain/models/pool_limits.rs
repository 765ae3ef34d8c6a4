//! Pool Limits Model

use std::time::Duration;

/// Idle/open connection limits and connection lifetime for the target pool.
///
/// Values are passed through unvalidated; zero or negative means "leave it to
/// the pool's own default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolLimits {
    pub max_idle: i32,
    pub max_open: i32,
    pub max_lifetime_secs: i64,
}

impl PoolLimits {
    /// Maximum open connections, if one was requested
    #[must_use]
    pub fn max_open(&self) -> Option<u32> {
        u32::try_from(self.max_open).ok().filter(|n| *n > 0)
    }

    /// Connections to keep warm, if any were requested
    #[must_use]
    pub fn max_idle(&self) -> Option<u32> {
        u32::try_from(self.max_idle).ok().filter(|n| *n > 0)
    }

    /// Connection lifetime; `None` means connections are never recycled for age
    #[must_use]
    pub fn max_lifetime(&self) -> Option<Duration> {
        u64::try_from(self.max_lifetime_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
