//! Persistence bootstrap and scoped dependency graph for MoneyManager.
//! This crate is the single source of truth for storage lifecycle
//! invariants: one live connection per scope, single-flight opens, and
//! atomic scope replacement.

pub mod config;
pub mod db;
pub mod driver;
pub mod graph;
pub mod location;
pub mod logging;
pub mod model;
pub mod repo;
pub mod version;

pub use config::{BootstrapParams, ConfigurationError, Platform, SandboxContext};
pub use db::{Database, DatabaseFactory, DbError, DbHandle, DbResult};
pub use driver::{
    Driver, DriverFactory, FileDriverFactory, MemoryDriverFactory, SandboxDriverFactory,
};
pub use graph::{DbScope, GraphError, ScopedGraph, TestHarness};
pub use location::{default_location, Location, DEFAULT_DB_DIR, DEFAULT_DB_NAME};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Account, AccountKind, Category, CategoryKind, NewAccount, NewCategory, NewTransaction,
    Transaction, TransactionListQuery, ValidationError,
};
pub use repo::{
    repositories_for, AccountRepository, CategoryRepository, RepoError, RepoResult, Repositories,
    SqliteAccountRepository, SqliteCategoryRepository, SqliteTransactionRepository,
    TransactionRepository,
};
pub use version::{read_version_resource, UNKNOWN_VERSION};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
