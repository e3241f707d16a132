//! Scoped dependency graph: two-phase bootstrap and lifecycle.
//!
//! # Responsibility
//! - Build configuration-phase singletons once per process from bootstrap
//!   parameters.
//! - Gate database-phase singletons behind a guarded, single-flight open
//!   transition.
//!
//! # Invariants
//! - States move `Uninitialized -> ConfigReady -> Opening -> Ready`, with
//!   `Closed` and `Failed` reachable from `Opening`/`Ready`.
//! - Exactly one physical open executes per ready transition; concurrent
//!   callers block on the state lock and observe the same scope or the same
//!   failure.
//! - Teardown closes the driver before declaring `Closed`; in-flight
//!   repository calls finish first because close waits on the handle lock.
//! - A scope is never resurrected: re-opening after `Closed`/`Failed`
//!   builds a brand-new database-phase scope.

use crate::config::{BootstrapParams, ConfigurationError, Platform};
use crate::db::{Database, DatabaseFactory, DbError};
use crate::driver::{DriverFactory, FileDriverFactory, SandboxDriverFactory};
use crate::location::{default_location, Location};
use crate::repo::{repositories_for, Repositories};
use crate::version::{read_version_resource, UNKNOWN_VERSION};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

pub mod harness;

pub use harness::TestHarness;

static BOOTSTRAP_GUARD: OnceCell<()> = OnceCell::new();

/// Lifecycle errors surfaced by the scoped graph.
#[derive(Debug, Clone)]
pub enum GraphError {
    /// Required platform parameters missing or invalid.
    Configuration(ConfigurationError),
    /// A second configuration-phase bootstrap was attempted in this process.
    AlreadyInitialized,
    /// Database-phase singletons accessed before `Ready` or after `Closed`.
    NotInitialized,
    /// Storage failure during the open transition. Shared so every caller
    /// of the same single-flight attempt observes the same failure.
    Db(Arc<DbError>),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "{err}"),
            Self::AlreadyInitialized => {
                write!(f, "configuration scope already initialized in this process")
            }
            Self::NotInitialized => {
                write!(f, "database scope is not ready or has been closed")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Db(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for GraphError {
    fn from(value: ConfigurationError) -> Self {
        Self::Configuration(value)
    }
}

impl From<DbError> for GraphError {
    fn from(value: DbError) -> Self {
        Self::Db(Arc::new(value))
    }
}

/// Database-phase scope: the open database plus its repository singletons.
///
/// Exists only while its database is open. Retained clones stay safe after
/// teardown: repository calls then fail `NotInitialized`.
pub struct DbScope {
    database: Database,
    repositories: Repositories,
}

impl std::fmt::Debug for DbScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbScope").finish_non_exhaustive()
    }
}

impl DbScope {
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repositories
    }
}

enum GraphState {
    ConfigReady,
    Opening,
    Ready(Arc<DbScope>),
    Failed(GraphError),
    Closed,
}

impl GraphState {
    fn name(&self) -> &'static str {
        match self {
            Self::ConfigReady => "config_ready",
            Self::Opening => "opening",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
            Self::Closed => "closed",
        }
    }
}

struct GraphInner {
    state: GraphState,
    location: Location,
}

/// Two-phase dependency container.
///
/// Configuration-phase singletons (effective location, database factory,
/// app version) are available immediately after bootstrap. Database-phase
/// singletons come from `ready()`.
pub struct ScopedGraph {
    db_factory: DatabaseFactory,
    app_version: String,
    inner: Mutex<GraphInner>,
}

impl std::fmt::Debug for ScopedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedGraph")
            .field("app_version", &self.app_version)
            .finish_non_exhaustive()
    }
}

impl ScopedGraph {
    /// Builds the configuration-phase scope. At most once per process.
    ///
    /// The process slot is claimed only when assembly succeeds: a bootstrap
    /// rejected for bad parameters leaves the slot free for a corrected
    /// retry.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second successful call in the same
    ///   process.
    /// - `Configuration` when parameters fail validation or no default
    ///   location can be resolved.
    pub fn bootstrap(params: BootstrapParams) -> Result<Self, GraphError> {
        if BOOTSTRAP_GUARD.get().is_some() {
            return Err(GraphError::AlreadyInitialized);
        }
        let graph = Self::assemble(params)?;
        if BOOTSTRAP_GUARD.set(()).is_err() {
            return Err(GraphError::AlreadyInitialized);
        }
        Ok(graph)
    }

    pub(crate) fn assemble(params: BootstrapParams) -> Result<Self, GraphError> {
        params.validate()?;
        let location = default_location(&params)?;

        let driver_factory: Arc<dyn DriverFactory> = match &params.platform {
            Platform::Desktop { .. } => Arc::new(FileDriverFactory::new()),
            Platform::Mobile { sandbox } => Arc::new(SandboxDriverFactory::new(sandbox.clone())),
        };

        let app_version = params
            .version_resource
            .as_deref()
            .map(read_version_resource)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        info!(
            "event=graph_bootstrap module=graph status=ok location={} version={}",
            location.describe(),
            app_version
        );

        Ok(Self::from_parts(
            DatabaseFactory::new(driver_factory),
            location,
            app_version,
        ))
    }

    pub(crate) fn from_parts(
        db_factory: DatabaseFactory,
        location: Location,
        app_version: String,
    ) -> Self {
        Self {
            db_factory,
            app_version,
            inner: Mutex::new(GraphInner {
                state: GraphState::ConfigReady,
                location,
            }),
        }
    }

    /// Requests database-phase readiness, opening storage if needed.
    ///
    /// Single-flight: the open runs under the state lock, so concurrent
    /// callers block and then share the resulting scope. After a failed
    /// transition the graph stays `Failed` and every caller receives that
    /// same failure until `reopen`/`switch_location` is requested.
    ///
    /// # Errors
    /// - `Db` when the underlying open fails.
    pub fn ready(&self) -> Result<Arc<DbScope>, GraphError> {
        let mut inner = self.lock_inner();
        match &inner.state {
            GraphState::Ready(scope) => return Ok(Arc::clone(scope)),
            GraphState::Failed(err) => return Err(err.clone()),
            GraphState::ConfigReady | GraphState::Opening | GraphState::Closed => {}
        }
        self.open_locked(&mut inner)
    }

    /// Returns the current database-phase scope without transitioning.
    ///
    /// # Errors
    /// - `NotInitialized` unless the graph is `Ready`.
    pub fn scope(&self) -> Result<Arc<DbScope>, GraphError> {
        let inner = self.lock_inner();
        match &inner.state {
            GraphState::Ready(scope) => Ok(Arc::clone(scope)),
            _ => Err(GraphError::NotInitialized),
        }
    }

    /// Tears the database-phase scope down.
    ///
    /// Closes the underlying driver before declaring `Closed`; waits for
    /// in-flight repository operations to finish. Idempotent.
    pub fn close(&self) {
        let mut inner = self.lock_inner();
        if let GraphState::Ready(scope) = &inner.state {
            scope.database.close();
        }
        let from = inner.state.name();
        inner.state = GraphState::Closed;
        info!(
            "event=graph_close module=graph status=ok from_state={from} location={}",
            inner.location.describe()
        );
    }

    /// Closes the current scope (if any) and opens a brand-new one at the
    /// same location. Clears a `Failed` state.
    pub fn reopen(&self) -> Result<Arc<DbScope>, GraphError> {
        let mut inner = self.lock_inner();
        if let GraphState::Ready(scope) = &inner.state {
            scope.database.close();
        }
        inner.state = GraphState::Closed;
        self.open_locked(&mut inner)
    }

    /// Switches the target location: teardown, then reopen at `location`.
    ///
    /// Fully serialized with repository calls: the old driver closes only
    /// after in-flight work completes, and calls arriving mid-switch fail
    /// `NotInitialized` on their retained handles until the new scope is
    /// fetched.
    pub fn switch_location(&self, location: Location) -> Result<Arc<DbScope>, GraphError> {
        let mut inner = self.lock_inner();
        if let GraphState::Ready(scope) = &inner.state {
            scope.database.close();
        }
        inner.state = GraphState::Closed;
        info!(
            "event=graph_switch module=graph status=start from={} to={}",
            inner.location.describe(),
            location.describe()
        );
        inner.location = location;
        self.open_locked(&mut inner)
    }

    /// Effective location the next open will target.
    pub fn location(&self) -> Location {
        self.lock_inner().location.clone()
    }

    /// Application version resolved at bootstrap (soft-failing reader).
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.lock_inner().state, GraphState::Ready(_))
    }

    /// Current state name, for diagnostics.
    pub fn state_name(&self) -> &'static str {
        self.lock_inner().state.name()
    }

    fn open_locked(&self, inner: &mut GraphInner) -> Result<Arc<DbScope>, GraphError> {
        inner.state = GraphState::Opening;
        match self.db_factory.open(&inner.location) {
            Ok(database) => {
                let repositories = repositories_for(&database);
                let scope = Arc::new(DbScope {
                    database,
                    repositories,
                });
                inner.state = GraphState::Ready(Arc::clone(&scope));
                Ok(scope)
            }
            Err(err) => {
                let err = GraphError::from(err);
                inner.state = GraphState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, GraphInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
