//! Bootstrap Domain Model
//!
//! The immutable parameter set for one bootstrap run, the stages the run
//! moves through, and its result.

use super::connection_template::ConnectionTemplate;
use super::identifier::Identifier;
use super::pool_limits::PoolLimits;

/// Stages of the bootstrap sequence, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootstrapStage {
    Start,
    AdminConnected,
    DatabaseChecked,
    Created,
    AlreadyExists,
    AdminClosed,
    TargetConnected,
    PoolConfigured,
    ExtensionsInstalled,
    Ready,
}

impl BootstrapStage {
    /// Stable name used in log fields
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::AdminConnected => "admin_connected",
            Self::DatabaseChecked => "database_checked",
            Self::Created => "created",
            Self::AlreadyExists => "already_exists",
            Self::AdminClosed => "admin_closed",
            Self::TargetConnected => "target_connected",
            Self::PoolConfigured => "pool_configured",
            Self::ExtensionsInstalled => "extensions_installed",
            Self::Ready => "ready",
        }
    }
}

impl std::fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one bootstrap run. Immutable once built.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    template: ConnectionTemplate,
    database: Identifier,
    pool_limits: PoolLimits,
    extensions: Vec<Identifier>,
}

impl BootstrapConfig {
    /// Create a new BootstrapConfig
    #[must_use]
    pub fn new(
        template: ConnectionTemplate,
        database: Identifier,
        pool_limits: PoolLimits,
        extensions: Vec<Identifier>,
    ) -> Self {
        Self {
            template,
            database,
            pool_limits,
            extensions,
        }
    }

    /// Template pointing at the administrative database
    #[must_use]
    pub fn admin_template(&self) -> &ConnectionTemplate {
        &self.template
    }

    /// Template pointing at the target database
    #[must_use]
    pub fn target_template(&self) -> ConnectionTemplate {
        self.template.for_database(&self.database)
    }

    #[must_use]
    pub fn database(&self) -> &Identifier {
        &self.database
    }

    #[must_use]
    pub fn pool_limits(&self) -> &PoolLimits {
        &self.pool_limits
    }

    /// Extensions to enable, in installation order
    #[must_use]
    pub fn extensions(&self) -> &[Identifier] {
        &self.extensions
    }
}

/// Outcome of a completed bootstrap
#[derive(Debug)]
pub struct Bootstrapped<P> {
    /// The ready pool, owned by the caller from here on
    pub pool: P,
    /// Whether this run created the database (informational)
    pub created: bool,
}
