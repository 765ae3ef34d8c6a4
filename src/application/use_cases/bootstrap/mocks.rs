//! In-memory stand-ins for the database server gateways.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::domain::gateways::{AdminSession, DatabaseConnector, TargetDatabase};
use crate::domain::models::connection_template::ConnectionTemplate;
use crate::domain::models::identifier::Identifier;
use crate::domain::models::pool_limits::PoolLimits;
use crate::domain::models::statements;
use crate::shared::errors::ServerError;

fn failure(message: &str) -> ServerError {
    ServerError::Database(sqlx::Error::Protocol(message.to_string()))
}

#[derive(Default)]
struct Inner {
    databases: HashSet<String>,
    extensions: Vec<String>,
    events: Vec<String>,
    fail_admin_connect: bool,
    fail_target_connect: bool,
    fail_existence_check: bool,
    fail_creation: bool,
    fail_close: bool,
    failing_extensions: HashSet<String>,
    open_admin_sessions: usize,
    pool_limits: Option<PoolLimits>,
}

/// Shared, inspectable state of the fake server
#[derive(Clone, Default)]
pub struct ServerState(Arc<Mutex<Inner>>);

impl ServerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(self, name: &str) -> Self {
        self.0.lock().unwrap().databases.insert(name.to_string());
        self
    }

    pub fn failing_admin_connect(self) -> Self {
        self.0.lock().unwrap().fail_admin_connect = true;
        self
    }

    pub fn failing_target_connect(self) -> Self {
        self.0.lock().unwrap().fail_target_connect = true;
        self
    }

    pub fn failing_existence_check(self) -> Self {
        self.0.lock().unwrap().fail_existence_check = true;
        self
    }

    pub fn failing_creation(self) -> Self {
        self.0.lock().unwrap().fail_creation = true;
        self
    }

    pub fn failing_close(self) -> Self {
        self.0.lock().unwrap().fail_close = true;
        self
    }

    pub fn failing_extension(self, name: &str) -> Self {
        self.0
            .lock()
            .unwrap()
            .failing_extensions
            .insert(name.to_string());
        self
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.0.lock().unwrap().databases.contains(name)
    }

    /// Extensions enabled so far, in order
    pub fn extensions(&self) -> Vec<String> {
        self.0.lock().unwrap().extensions.clone()
    }

    /// Every call made against the server, in order
    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().events.clone()
    }

    /// Only the DDL statements issued
    pub fn statements(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.starts_with("CREATE"))
            .collect()
    }

    pub fn open_admin_sessions(&self) -> usize {
        self.0.lock().unwrap().open_admin_sessions
    }

    pub fn pool_limits(&self) -> Option<PoolLimits> {
        self.0.lock().unwrap().pool_limits
    }

    fn record(&self, event: String) {
        self.0.lock().unwrap().events.push(event);
    }
}

pub struct MockAdminSession {
    state: ServerState,
}

impl MockAdminSession {
    pub fn new(state: ServerState) -> Self {
        state.0.lock().unwrap().open_admin_sessions += 1;
        Self { state }
    }
}

#[async_trait]
impl AdminSession for MockAdminSession {
    async fn database_exists(&mut self, name: &Identifier) -> Result<bool, ServerError> {
        self.state.record(format!("exists {name}"));
        let inner = self.state.0.lock().unwrap();
        if inner.fail_existence_check {
            return Err(failure("catalog unavailable"));
        }
        Ok(inner.databases.contains(name.as_str()))
    }

    async fn create_database(&mut self, name: &Identifier) -> Result<(), ServerError> {
        self.state.record(statements::create_database(name));
        let mut inner = self.state.0.lock().unwrap();
        if inner.fail_creation {
            return Err(failure("permission denied to create database"));
        }
        inner.databases.insert(name.as_str().to_string());
        Ok(())
    }

    async fn close(self) -> Result<(), ServerError> {
        self.state.record("close admin".to_string());
        let mut inner = self.state.0.lock().unwrap();
        inner.open_admin_sessions -= 1;
        if inner.fail_close {
            return Err(failure("connection reset"));
        }
        Ok(())
    }
}

pub struct MockTarget {
    state: ServerState,
}

impl std::fmt::Debug for MockTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTarget").finish_non_exhaustive()
    }
}

#[async_trait]
impl TargetDatabase for MockTarget {
    async fn enable_extension(&self, name: &Identifier) -> Result<(), ServerError> {
        self.state.record(statements::create_extension(name));
        let mut inner = self.state.0.lock().unwrap();
        if inner.failing_extensions.contains(name.as_str()) {
            return Err(failure("extension is not available"));
        }
        if !inner.extensions.iter().any(|e| e == name.as_str()) {
            inner.extensions.push(name.as_str().to_string());
        }
        Ok(())
    }
}

pub struct MockConnector {
    state: ServerState,
}

impl MockConnector {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl DatabaseConnector for MockConnector {
    type Admin = MockAdminSession;
    type Target = MockTarget;

    async fn connect_admin(
        &self,
        template: &ConnectionTemplate,
    ) -> Result<Self::Admin, ServerError> {
        self.state
            .record(format!("connect admin {}", template.database()));
        if self.state.0.lock().unwrap().fail_admin_connect {
            return Err(failure("connection refused"));
        }
        Ok(MockAdminSession::new(self.state.clone()))
    }

    async fn connect_target(
        &self,
        template: &ConnectionTemplate,
        limits: &PoolLimits,
    ) -> Result<Self::Target, ServerError> {
        self.state
            .record(format!("connect target {}", template.database()));
        let mut inner = self.state.0.lock().unwrap();
        if inner.fail_target_connect || !inner.databases.contains(template.database()) {
            return Err(failure("database does not exist"));
        }
        inner.pool_limits = Some(*limits);
        Ok(MockTarget {
            state: self.state.clone(),
        })
    }
}

/// Tracing layer appending every `stage` field to the server's event log, so
/// stage transitions can be checked against the calls around them
pub struct StageRecorder(pub ServerState);

impl<S: Subscriber> Layer<S> for StageRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = StageVisitor(None);
        event.record(&mut visitor);
        if let Some(stage) = visitor.0 {
            self.0.record(format!("stage {stage}"));
        }
    }
}

struct StageVisitor(Option<String>);

impl Visit for StageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "stage" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}
