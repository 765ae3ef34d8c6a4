//! Cache Client Builder
//!
//! Maps cache settings onto a Redis client handle. No connection is made
//! here; the client connects lazily on first use.

use std::time::Duration;

use redis::{Client, Connection, RedisError};

use super::config::CacheConfig;

/// Redis client plus the per-connection timeouts from configuration
#[derive(Debug, Clone)]
pub struct CacheClient {
    client: Client,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl CacheClient {
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    #[must_use]
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout
    }

    /// Open a connection with the configured read and write timeouts applied
    ///
    /// # Errors
    ///
    /// Returns `RedisError` if the server cannot be reached or rejects the
    /// credentials.
    pub fn connection(&self) -> Result<Connection, RedisError> {
        let connection = self.client.get_connection()?;
        connection.set_read_timeout(self.read_timeout)?;
        connection.set_write_timeout(self.write_timeout)?;
        Ok(connection)
    }
}

/// Build the `redis://` URL for these settings, credentials percent-encoded
#[must_use]
pub fn cache_url(config: &CacheConfig) -> String {
    let credentials = match (&config.user, &config.password) {
        (Some(user), Some(password)) => format!(
            "{}:{}@",
            urlencoding::encode(user),
            urlencoding::encode(password)
        ),
        (None, Some(password)) => format!(":{}@", urlencoding::encode(password)),
        (Some(user), None) => format!("{}@", urlencoding::encode(user)),
        (None, None) => String::new(),
    };

    format!("redis://{credentials}{}:{}", config.host, config.port)
}

/// Create a Redis client from configuration
///
/// # Errors
///
/// Returns `RedisError` if the settings do not form a valid Redis URL
/// (for example an empty host).
pub fn build_cache_client(config: &CacheConfig) -> Result<CacheClient, RedisError> {
    let client = Client::open(cache_url(config))?;

    if config.has_pool_tuning() {
        tracing::debug!(
            pool_size = config.pool_size,
            min_idle_conns = config.min_idle_conns,
            max_idle_conns = config.max_idle_conns,
            "Cache pool settings are not applied by this client"
        );
    }
    tracing::info!(
        host = %config.host,
        port = config.port,
        read_timeout = ?config.read_timeout(),
        write_timeout = ?config.write_timeout(),
        "Cache client created"
    );

    Ok(CacheClient {
        client,
        read_timeout: config.read_timeout(),
        write_timeout: config.write_timeout(),
    })
}
