//! Domain records for the personal-finance ledger.
//!
//! # Responsibility
//! - Define the stored shapes (`Account`, `Category`, `Transaction`) and the
//!   creation drafts repositories accept.
//!
//! # Invariants
//! - Identifiers and timestamps are server-assigned on create and preserved
//!   on read; drafts never carry them.
//! - `updated_at >= created_at` for every stored record.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account;
pub mod category;
pub mod transaction;

pub use account::{Account, AccountKind, NewAccount};
pub use category::{Category, CategoryKind, NewCategory};
pub use transaction::{NewTransaction, Transaction, TransactionListQuery};

/// Domain validation failures raised before any persistence happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    InvalidCurrencyCode(String),
    ZeroAmount,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidCurrencyCode(code) => {
                write!(f, "currency code must be 3 ASCII letters, got `{code}`")
            }
            Self::ZeroAmount => write!(f, "transaction amount cannot be zero"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

pub(crate) fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrencyCode(code.to_string()));
    }
    Ok(())
}
