//! Disposable scoped-graph instances for tests.
//!
//! # Responsibility
//! - Produce isolated, throwaway database scopes with the same state
//!   machine as production.
//!
//! # Invariants
//! - Harness locations never coincide with the production default: memory
//!   harnesses use a unique ephemeral name, on-disk harnesses a unique
//!   temp-directory file.
//! - Each harness owns an exclusive driver; instances are never shared
//!   across concurrent test executions.
//! - Teardown is guaranteed on drop regardless of test outcome.

use crate::db::DatabaseFactory;
use crate::driver::{DriverFactory, FileDriverFactory, MemoryDriverFactory};
use crate::graph::{DbScope, GraphError, ScopedGraph};
use crate::location::Location;
use crate::version::UNKNOWN_VERSION;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Test-harness variant of the scoped graph.
///
/// Skips the process-wide bootstrap guard so every test owns a fresh
/// instance, and opens the database eagerly: construction hands back a
/// graph already in `Ready`.
pub struct TestHarness {
    graph: Arc<ScopedGraph>,
    temp_db: Option<PathBuf>,
}

impl TestHarness {
    /// Ephemeral in-memory harness. Nothing survives teardown.
    pub fn new() -> Result<Self, GraphError> {
        let location = Location::SandboxedNamed(format!("harness-{}", Uuid::new_v4()));
        Self::with_driver_factory(Arc::new(MemoryDriverFactory::new()), location)
    }

    /// On-disk harness backed by a unique file under the system temp
    /// directory; the file is removed on drop.
    pub fn on_disk() -> Result<Self, GraphError> {
        let path = std::env::temp_dir().join(format!(
            "moneymanager-harness-{}-{}.db",
            std::process::id(),
            Uuid::new_v4()
        ));
        let graph = ScopedGraph::from_parts(
            DatabaseFactory::new(Arc::new(FileDriverFactory::new())),
            Location::File(path.clone()),
            UNKNOWN_VERSION.to_string(),
        );
        graph.ready()?;
        Ok(Self {
            graph: Arc::new(graph),
            temp_db: Some(path),
        })
    }

    /// Harness over an injected driver factory, for instrumented tests
    /// (e.g. counting physical opens).
    pub fn with_driver_factory(
        factory: Arc<dyn DriverFactory>,
        location: Location,
    ) -> Result<Self, GraphError> {
        let graph = ScopedGraph::from_parts(
            DatabaseFactory::new(factory),
            location,
            UNKNOWN_VERSION.to_string(),
        );
        graph.ready()?;
        Ok(Self {
            graph: Arc::new(graph),
            temp_db: None,
        })
    }

    pub fn graph(&self) -> Arc<ScopedGraph> {
        Arc::clone(&self.graph)
    }

    /// The ready database-phase scope.
    pub fn scope(&self) -> Result<Arc<DbScope>, GraphError> {
        self.graph.scope()
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.graph.close();
        if let Some(path) = &self.temp_db {
            let _ = std::fs::remove_file(path);
        }
    }
}
