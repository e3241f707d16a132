//! Database factory: open, configure and migrate storage for a location.
//!
//! # Responsibility
//! - Combine a driver factory and a location into a fully schema-migrated
//!   database handle.
//! - Close partially-opened drivers on any failure so no connection leaks.
//!
//! # Invariants
//! - Returned databases have `foreign_keys=ON` and all migrations applied.
//! - `open` is idempotent in effect but re-validates schema on every call;
//!   single-instance semantics belong to the scoped graph, not here.

use super::migrations::apply_migrations;
use super::{Database, DbResult};
use crate::driver::DriverFactory;
use crate::location::Location;
use log::{error, info};
use rusqlite::Connection;
use std::sync::Arc;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens schema-migrated databases through one driver factory variant.
pub struct DatabaseFactory {
    driver_factory: Arc<dyn DriverFactory>,
}

impl DatabaseFactory {
    pub fn new(driver_factory: Arc<dyn DriverFactory>) -> Self {
        Self { driver_factory }
    }

    /// Opens the database at `location` and applies pending migrations.
    ///
    /// # Side effects
    /// - Creates the backing store when absent (driver-variant dependent).
    /// - Emits `db_open` logging events with duration and status.
    ///
    /// # Errors
    /// - Storage variants of `DbError` when the driver cannot open.
    /// - `IncompatibleSchema`/`MissingMigration` from the migration step; the
    ///   partially-opened driver is dropped before the error propagates.
    pub fn open(&self, location: &Location) -> DbResult<Database> {
        let started_at = Instant::now();
        let mode = self.driver_factory.mode();
        info!(
            "event=db_open module=db status=start mode={mode} location={}",
            location.describe()
        );

        let driver = match self.driver_factory.create_driver(location) {
            Ok(driver) => driver,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error_code=driver_create_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err);
            }
        };

        let mut conn = driver.into_connection();
        match bootstrap_connection(&mut conn) {
            Ok(()) => {
                info!(
                    "event=db_open module=db status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Database::new(conn, location.clone()))
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                // Close the connection before surfacing the failure.
                drop(conn);
                Err(err)
            }
        }
    }

    /// Authoritative existence check, delegated to the driver variant.
    ///
    /// This is the query to use for sandboxed-named locations, whose own
    /// `exists` is optimistic.
    pub fn database_exists(&self, location: &Location) -> DbResult<bool> {
        self.driver_factory.database_exists(location)
    }

    pub fn mode(&self) -> &'static str {
        self.driver_factory.mode()
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
