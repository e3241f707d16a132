//! Schema migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing version order.
//! - Apply pending migrations atomically on open.
//!
//! # Invariants
//! - Migrations are forward-only and idempotent: re-applying an
//!   already-applied version is a no-op because applied versions are
//!   skipped.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A database versioned ahead of this binary is rejected; no downgrade is
//!   ever attempted.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_accounts.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_categories.sql"),
    },
    Migration {
        version: 3,
        sql: include_str!("0003_transactions.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
///
/// # Errors
/// - `IncompatibleSchema` when the database version is newer than this
///   binary supports.
/// - `MissingMigration` when the registered chain cannot bridge the gap
///   from the applied version to the latest in single-version steps.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::IncompatibleSchema {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let pending: Vec<Migration> = MIGRATIONS
        .iter()
        .copied()
        .filter(|migration| migration.version > current_version)
        .collect();

    let mut applied = current_version;
    for migration in &pending {
        if migration.version != applied + 1 {
            return Err(DbError::MissingMigration {
                applied,
                expected: migration.version,
            });
        }
        applied = migration.version;
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
