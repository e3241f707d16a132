//! Storage bootstrap, schema migration and database handle lifecycle.
//!
//! # Responsibility
//! - Define the storage error taxonomy shared by drivers, the database
//!   factory and repositories.
//! - Own the open-connection handle (`DbHandle`) that serializes repository
//!   access with teardown.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No repository reads or writes application data before migrations
//!   succeed.
//! - Exactly one live connection exists per database handle; `close` takes
//!   it out under the handle lock, so no caller ever observes a half-closed
//!   connection.

use crate::location::Location;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

pub mod migrations;
mod open;

pub use open::DatabaseFactory;

pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer errors surfaced by drivers and the database factory.
#[derive(Debug)]
pub enum DbError {
    /// Engine-level failure opening or using the storage (maps to the
    /// storage-unavailable failure mode).
    Storage(rusqlite::Error),
    /// Filesystem-level failure, e.g. creating parent directories.
    StorageIo(std::io::Error),
    /// The location shape is not served by the selected driver variant.
    UnsupportedLocation {
        mode: &'static str,
        location: String,
    },
    /// On-disk schema is newer than this build supports. No downgrade is
    /// attempted.
    IncompatibleSchema {
        db_version: u32,
        latest_supported: u32,
    },
    /// The forward migration chain has a gap; the database cannot be
    /// brought to the current version.
    MissingMigration { applied: u32, expected: u32 },
}

impl DbError {
    pub(crate) fn unsupported_location(mode: &'static str, location: &Location) -> Self {
        Self::UnsupportedLocation {
            mode,
            location: location.describe(),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage unavailable: {err}"),
            Self::StorageIo(err) => write!(f, "storage unavailable: {err}"),
            Self::UnsupportedLocation { mode, location } => {
                write!(f, "location {location} is not served by the {mode} driver")
            }
            Self::IncompatibleSchema {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingMigration { applied, expected } => write!(
                f,
                "migration chain has a gap: applied version {applied}, next registered step is {expected}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::StorageIo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::StorageIo(value)
    }
}

/// Marker for operations attempted against a closed database handle.
///
/// Converted by each consuming layer into its own not-initialized error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedHandle;

/// Shared handle over the single live connection of one open database.
///
/// Repositories hold this handle without owning the connection. Operations
/// run under the handle lock, so a close in progress waits for in-flight
/// work and later calls fail with a closed-handle marker instead of touching
/// a dead connection.
pub struct DbHandle {
    conn: Mutex<Option<Connection>>,
}

impl DbHandle {
    fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    /// Runs `f` against the open connection, serialized with `close`.
    ///
    /// # Errors
    /// - Converts to the caller's error type via `From<ClosedHandle>` when
    ///   the connection has been taken out.
    pub fn with_conn<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<ClosedHandle>,
    {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(E::from(ClosedHandle)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Takes the connection out and drops it. Returns whether it was open.
    fn close(&self) -> bool {
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        guard.take().is_some()
    }
}

/// A schema-migrated open connection plus the location it was opened at.
pub struct Database {
    handle: Arc<DbHandle>,
    location: Location,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    pub(crate) fn new(conn: Connection, location: Location) -> Self {
        Self {
            handle: Arc::new(DbHandle::new(conn)),
            location,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Clones the non-owning handle used by repositories.
    pub fn handle(&self) -> Arc<DbHandle> {
        Arc::clone(&self.handle)
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Closes the underlying connection.
    ///
    /// Waits for in-flight repository operations holding the handle lock,
    /// then drops the connection. Idempotent.
    pub fn close(&self) {
        if self.handle.close() {
            info!(
                "event=db_close module=db status=ok location={}",
                self.location.describe()
            );
        }
    }
}
