//! Database Bootstrap - Main Entry Point
//!
//! One-shot provisioning: make sure the configured database exists with its
//! extensions, check the pool answers, and exit.

use database_bootstrap::infrastructure::driven_adapters::cache_client::build_cache_client;
use database_bootstrap::infrastructure::driven_adapters::config::AppConfig;
use database_bootstrap::must_bootstrap;
use database_bootstrap::shared::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.logging, &config.app.name);
    tracing::info!("Configuration loaded successfully");

    let bootstrap_config = match config.database.to_bootstrap_config() {
        Ok(bootstrap_config) => bootstrap_config,
        Err(err) => {
            tracing::error!(error = %err, code = err.error_code(), "Invalid database configuration");
            std::process::exit(1);
        }
    };

    // Fail fast: any bootstrap error terminates the process
    let bootstrapped = must_bootstrap(&bootstrap_config).await;

    sqlx::query("SELECT 1").execute(&bootstrapped.pool).await?;
    tracing::info!(
        database = %bootstrap_config.database(),
        created = bootstrapped.created,
        "Database pool ready"
    );

    if let Some(cache) = &config.cache {
        let _cache_client = build_cache_client(cache)?;
    }

    bootstrapped.pool.close().await;
    Ok(())
}
