//! Common test utilities for e2e tests
//!
//! Provides test infrastructure for spinning up a PostgreSQL container and
//! building bootstrap configurations against it.

use std::io;
use std::sync::{Arc, Mutex};

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tracing_subscriber::fmt::MakeWriter;

use database_bootstrap::domain::{BootstrapConfig, ConnectionTemplate, Identifier, PoolLimits};
use database_bootstrap::infrastructure::driven_adapters::postgres::connect_options;

/// Test server context
pub struct TestServer {
    pub host: String,
    pub port: u16,
    _container: ContainerAsync<Postgres>,
}

impl TestServer {
    /// Start a fresh PostgreSQL server
    pub async fn new() -> Self {
        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let host = container
            .get_host()
            .await
            .expect("Failed to get host")
            .to_string();
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        Self {
            host,
            port,
            _container: container,
        }
    }

    /// key=value template pointing at the `postgres` maintenance database
    pub fn dsn(&self) -> String {
        format!(
            "host={} port={} user=postgres password=postgres dbname=postgres sslmode=disable",
            self.host, self.port
        )
    }

    pub fn template(&self) -> ConnectionTemplate {
        ConnectionTemplate::parse(&self.dsn(), "postgres").expect("Failed to parse template")
    }

    /// Bootstrap configuration for `database` with the given extensions
    pub fn config(&self, database: &str, extensions: &[&str]) -> BootstrapConfig {
        BootstrapConfig::new(
            self.template(),
            Identifier::new(database).expect("valid database name"),
            PoolLimits {
                max_idle: 1,
                max_open: 4,
                max_lifetime_secs: 300,
            },
            extensions
                .iter()
                .map(|e| Identifier::new(*e).expect("valid extension name"))
                .collect(),
        )
    }

    /// Pool on any database of this server, independent of the code under test
    pub async fn pool_on(&self, database: &str) -> PgPool {
        let template = self
            .template()
            .for_database(&Identifier::new(database).expect("valid database name"));
        PgPoolOptions::new()
            .max_connections(2)
            .connect_with(connect_options(&template).expect("valid options"))
            .await
            .expect("Failed to connect to test database")
    }

    pub async fn database_exists(&self, database: &str) -> bool {
        let pool = self.pool_on("postgres").await;
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)",
        )
        .bind(database)
        .fetch_one(&pool)
        .await
        .expect("Failed to query pg_database");
        pool.close().await;
        exists
    }

    pub async fn create_database(&self, database: &str) {
        let pool = self.pool_on("postgres").await;
        let statement = format!("CREATE DATABASE \"{}\"", database.replace('"', "\"\""));
        pool.execute(statement.as_str())
            .await
            .expect("Failed to create database");
        pool.close().await;
    }
}

/// Whether `extension` is enabled in the database `pool` is connected to
pub async fn extension_enabled(pool: &PgPool, extension: &str) -> bool {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM pg_extension WHERE extname = $1)")
        .bind(extension)
        .fetch_one(pool)
        .await
        .expect("Failed to query pg_extension")
}

/// In-memory log sink for asserting on emitted entries
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
