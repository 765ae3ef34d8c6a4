//! Connection Options
//!
//! Turns a validated connection template into sqlx connect options, field by
//! field, so no connection string is ever handed to the driver.

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::domain::models::connection_template::ConnectionTemplate;
use crate::shared::errors::ServerError;

/// Build PostgreSQL connect options from a template
///
/// Fields the template leaves out fall back to sqlx defaults (including the
/// `PG*` environment variables). `host` and `hostaddr` are mutually exclusive
/// in a parsed template, so either one sets the host dialled.
///
/// # Errors
///
/// Returns `ServerError` if a field the template parser accepted cannot be
/// applied; this only happens if the two disagree on the supported keys.
pub fn connect_options(template: &ConnectionTemplate) -> Result<PgConnectOptions, ServerError> {
    let mut options = PgConnectOptions::new();

    for (key, value) in template.fields() {
        options = match key {
            "host" | "hostaddr" => options.host(value),
            "port" => options.port(value.parse::<u16>().map_err(|e| configuration(key, e))?),
            "user" => options.username(value),
            "password" => options.password(value),
            "dbname" => options.database(value),
            "sslmode" => options.ssl_mode(ssl_mode(value)?),
            "sslrootcert" => options.ssl_root_cert(value),
            "sslcert" => options.ssl_client_cert(value),
            "sslkey" => options.ssl_client_key(value),
            "application_name" => options.application_name(value),
            other => {
                return Err(configuration(
                    other,
                    format!("unsupported connection key '{other}'"),
                ))
            }
        };
    }

    Ok(options)
}

fn ssl_mode(value: &str) -> Result<PgSslMode, ServerError> {
    match value {
        "disable" => Ok(PgSslMode::Disable),
        "allow" => Ok(PgSslMode::Allow),
        "prefer" => Ok(PgSslMode::Prefer),
        "require" => Ok(PgSslMode::Require),
        "verify-ca" => Ok(PgSslMode::VerifyCa),
        "verify-full" => Ok(PgSslMode::VerifyFull),
        other => Err(configuration("sslmode", format!("invalid sslmode '{other}'"))),
    }
}

fn configuration(key: &str, err: impl std::fmt::Display) -> ServerError {
    ServerError::Database(sqlx::Error::Configuration(
        format!("{key}: {err}").into(),
    ))
}
