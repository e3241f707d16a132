//! Storage driver abstraction and platform factory variants.
//!
//! # Responsibility
//! - Wrap one open storage-engine connection as an opaque `Driver`.
//! - Open brand-new drivers per platform: persistent file, sandboxed named
//!   store, or ephemeral in-memory.
//!
//! # Invariants
//! - Factories cache nothing: every `create_driver` call yields a new
//!   connection. Ownership and reuse are the database factory's concern.
//! - A `Driver` is never shared across processes or scopes.
//! - I/O failures surface as `DbError` storage variants, never panics.

use crate::config::SandboxContext;
use crate::db::{DbError, DbResult};
use crate::location::Location;
use rusqlite::Connection;
use std::path::Path;

/// Opaque handle to one open storage-engine connection.
///
/// Consumed by the database factory during schema bootstrap; dropping a
/// driver closes the underlying connection.
#[derive(Debug)]
pub struct Driver {
    conn: Connection,
}

impl Driver {
    fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn into_connection(self) -> Connection {
        self.conn
    }
}

/// Capability seam for opening drivers, selected at composition time.
///
/// Implementations must be total over `Location` shapes: a shape the variant
/// cannot serve is reported as an error, not a panic.
pub trait DriverFactory: Send + Sync {
    /// Opens a brand-new driver for the location.
    fn create_driver(&self, location: &Location) -> DbResult<Driver>;

    /// Authoritative existence check for the location's backing store.
    ///
    /// This is the query callers must use when `Location::exists` is only
    /// best-effort (sandboxed-named locations).
    fn database_exists(&self, location: &Location) -> DbResult<bool>;

    /// Short mode tag used in diagnostics (`file`, `sandbox`, `memory`).
    fn mode(&self) -> &'static str;
}

/// Desktop variant: opens or creates a database file at a filesystem path,
/// creating parent directories as needed.
#[derive(Debug, Default)]
pub struct FileDriverFactory;

impl FileDriverFactory {
    pub fn new() -> Self {
        Self
    }
}

impl DriverFactory for FileDriverFactory {
    fn create_driver(&self, location: &Location) -> DbResult<Driver> {
        match location {
            Location::File(path) => open_file_driver(path),
            other => Err(DbError::unsupported_location(self.mode(), other)),
        }
    }

    fn database_exists(&self, location: &Location) -> DbResult<bool> {
        match location {
            Location::File(path) => Ok(path.exists()),
            other => Err(DbError::unsupported_location(self.mode(), other)),
        }
    }

    fn mode(&self) -> &'static str {
        "file"
    }
}

/// Mobile variant: resolves named stores through a platform-owned sandbox
/// context. The sandbox creates entries on first open.
#[derive(Debug)]
pub struct SandboxDriverFactory {
    context: SandboxContext,
}

impl SandboxDriverFactory {
    pub fn new(context: SandboxContext) -> Self {
        Self { context }
    }
}

impl DriverFactory for SandboxDriverFactory {
    fn create_driver(&self, location: &Location) -> DbResult<Driver> {
        match location {
            Location::SandboxedNamed(name) => open_file_driver(&self.context.resolve(name)),
            other => Err(DbError::unsupported_location(self.mode(), other)),
        }
    }

    fn database_exists(&self, location: &Location) -> DbResult<bool> {
        match location {
            Location::SandboxedNamed(name) => Ok(self.context.resolve(name).exists()),
            other => Err(DbError::unsupported_location(self.mode(), other)),
        }
    }

    fn mode(&self) -> &'static str {
        "sandbox"
    }
}

/// Test variant: connections backed by no durable storage, destroyed on
/// close. Existence is always `false` because nothing outlives the driver.
#[derive(Debug, Default)]
pub struct MemoryDriverFactory;

impl MemoryDriverFactory {
    pub fn new() -> Self {
        Self
    }
}

impl DriverFactory for MemoryDriverFactory {
    fn create_driver(&self, _location: &Location) -> DbResult<Driver> {
        let conn = Connection::open_in_memory()?;
        Ok(Driver::new(conn))
    }

    fn database_exists(&self, _location: &Location) -> DbResult<bool> {
        Ok(false)
    }

    fn mode(&self) -> &'static str {
        "memory"
    }
}

fn open_file_driver(path: &Path) -> DbResult<Driver> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    Ok(Driver::new(conn))
}

#[cfg(test)]
mod tests {
    use super::{DriverFactory, FileDriverFactory, MemoryDriverFactory, SandboxDriverFactory};
    use crate::config::SandboxContext;
    use crate::db::DbError;
    use crate::location::Location;
    use std::path::PathBuf;

    #[test]
    fn file_factory_rejects_sandboxed_location() {
        let factory = FileDriverFactory::new();
        let location = Location::SandboxedNamed("ledger.db".to_string());
        let err = factory.create_driver(&location).unwrap_err();
        assert!(matches!(err, DbError::UnsupportedLocation { .. }));
    }

    #[test]
    fn sandbox_factory_rejects_file_location() {
        let context = SandboxContext::new("/data/app").unwrap();
        let factory = SandboxDriverFactory::new(context);
        let location = Location::File(PathBuf::from("/tmp/ledger.db"));
        let err = factory.database_exists(&location).unwrap_err();
        assert!(matches!(err, DbError::UnsupportedLocation { .. }));
    }

    #[test]
    fn memory_factory_reports_nothing_durable() {
        let factory = MemoryDriverFactory::new();
        let location = Location::SandboxedNamed("ephemeral".to_string());
        assert!(!factory.database_exists(&location).unwrap());
        factory.create_driver(&location).unwrap();
        assert!(!factory.database_exists(&location).unwrap());
    }
}
