//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define domain-CRUD contracts over accounts, categories and
//!   transactions.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate drafts/records before SQL mutations.
//! - Repositories hold a non-owning database handle: they never close the
//!   connection and never construct their own driver.
//! - Every call against a closed database fails `NotInitialized`, never
//!   panics and never silently succeeds.

use crate::db::{ClosedHandle, Database, DbError};
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod account_repo;
pub mod category_repo;
pub mod transaction_repo;

pub use account_repo::{AccountRepository, SqliteAccountRepository};
pub use category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use transaction_repo::{SqliteTransactionRepository, TransactionRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for ledger persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(Uuid),
    /// The owning database-phase scope is gone (not yet ready, or closed).
    NotInitialized,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::NotInitialized => write!(f, "database is not initialized or has been closed"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Storage(value))
    }
}

impl From<ClosedHandle> for RepoError {
    fn from(_: ClosedHandle) -> Self {
        Self::NotInitialized
    }
}

/// Database-phase repository bundle bound to one open database.
pub struct Repositories {
    accounts: SqliteAccountRepository,
    categories: SqliteCategoryRepository,
    transactions: SqliteTransactionRepository,
}

impl Repositories {
    pub fn accounts(&self) -> &SqliteAccountRepository {
        &self.accounts
    }

    pub fn categories(&self) -> &SqliteCategoryRepository {
        &self.categories
    }

    pub fn transactions(&self) -> &SqliteTransactionRepository {
        &self.transactions
    }
}

/// Builds the repository bundle for one open database.
///
/// Each repository shares the database's non-owning handle; closing the
/// database invalidates them all at once.
pub fn repositories_for(database: &Database) -> Repositories {
    Repositories {
        accounts: SqliteAccountRepository::new(database.handle()),
        categories: SqliteCategoryRepository::new(database.handle()),
        transactions: SqliteTransactionRepository::new(database.handle()),
    }
}

pub(crate) fn parse_uuid_column(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
