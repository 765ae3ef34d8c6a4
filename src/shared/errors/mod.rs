//! Error Types
//!
//! Error taxonomy for the bootstrap sequence. Gateways report `ServerError`,
//! use cases attach the stage that failed and surface `BootstrapError`.

use thiserror::Error;

use crate::domain::models::bootstrap::BootstrapStage;
use crate::domain::models::identifier::MAX_IDENTIFIER_BYTES;

/// Invalid database or extension identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,

    #[error("identifier '{0}' exceeds {} bytes", MAX_IDENTIFIER_BYTES)]
    TooLong(String),

    #[error("identifier must not contain a NUL byte")]
    NulByte,
}

/// Connection template rejected during validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("connection URIs are not supported, use key=value form")]
    UriForm,

    #[error("malformed connection template at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },

    #[error("unsupported connection key '{0}'")]
    UnsupportedKey(String),

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("invalid sslmode '{0}'")]
    InvalidSslMode(String),

    #[error("connection template sets both host and hostaddr, use one")]
    ConflictingHost,

    #[error("connection template has no dbname")]
    MissingDatabase,

    #[error("connection template sets dbname more than once")]
    DuplicateDatabase,

    #[error("connection template must target administrative database '{expected}', found '{found}'")]
    UnexpectedDatabase { expected: String, found: String },
}

/// Gateway-level failure talking to the database server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Which connection a `BootstrapError::Connection` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    Admin,
    Target,
}

impl std::fmt::Display for ConnectionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Bootstrap failures. Every variant aborts the sequence.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to connect to {role} database '{database}': {source}")]
    Connection {
        role: ConnectionRole,
        database: String,
        #[source]
        source: ServerError,
    },

    #[error("Failed to check whether database '{database}' exists: {source}")]
    ExistenceCheck {
        database: String,
        #[source]
        source: ServerError,
    },

    #[error("Failed to create database '{database}': {source}")]
    Creation {
        database: String,
        #[source]
        source: ServerError,
    },

    #[error("Failed to create extension {extension}: {source}")]
    Extension {
        extension: String,
        #[source]
        source: ServerError,
    },
}

impl BootstrapError {
    /// Stage the sequence was in when it aborted
    #[must_use]
    pub fn stage(&self) -> BootstrapStage {
        match self {
            Self::InvalidConfig(_) => BootstrapStage::Start,
            Self::Connection {
                role: ConnectionRole::Admin,
                ..
            }
            | Self::ExistenceCheck { .. } => BootstrapStage::AdminConnected,
            Self::Creation { .. } => BootstrapStage::DatabaseChecked,
            Self::Connection {
                role: ConnectionRole::Target,
                ..
            } => BootstrapStage::AdminClosed,
            Self::Extension { .. } => BootstrapStage::PoolConfigured,
        }
    }

    /// Get the error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::ExistenceCheck { .. } => "EXISTENCE_CHECK_ERROR",
            Self::Creation { .. } => "CREATION_ERROR",
            Self::Extension { .. } => "EXTENSION_ERROR",
        }
    }
}

impl From<TemplateError> for BootstrapError {
    fn from(err: TemplateError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl From<IdentifierError> for BootstrapError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BootstrapError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.as_ref().map_or("invalid", |m| m.as_ref())
                    )
                })
            })
            .collect();
        messages.sort();
        Self::InvalidConfig(messages.join("; "))
    }
}
