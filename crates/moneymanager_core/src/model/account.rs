//! Account domain model.

use super::{validate_currency_code, validate_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broad account classification used for grouping and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Physical cash on hand.
    Cash,
    /// Checking or savings account.
    Bank,
    /// Credit or debit card.
    Card,
}

/// Stored account record.
///
/// `id`, `created_at` and `updated_at` are assigned by the repository on
/// create and preserved on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    /// ISO 4217 alpha code, e.g. `USD`.
    pub currency_code: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; never earlier than `created_at`.
    pub updated_at: i64,
}

/// Creation draft accepted by `AccountRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub currency_code: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        kind: AccountKind,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            currency_code: currency_code.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_currency_code(&self.currency_code)?;
        Ok(())
    }
}

impl Account {
    /// Validates fields a caller may have edited before an update.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_currency_code(&self.currency_code)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountKind, NewAccount};
    use crate::model::ValidationError;

    #[test]
    fn draft_with_blank_name_is_rejected() {
        let draft = NewAccount::new("   ", AccountKind::Cash, "USD");
        assert_eq!(draft.validate().unwrap_err(), ValidationError::EmptyName);
    }

    #[test]
    fn draft_with_bad_currency_is_rejected() {
        let draft = NewAccount::new("Wallet", AccountKind::Cash, "US");
        assert!(matches!(
            draft.validate().unwrap_err(),
            ValidationError::InvalidCurrencyCode(_)
        ));
    }

    #[test]
    fn valid_draft_passes() {
        NewAccount::new("Wallet", AccountKind::Cash, "EUR")
            .validate()
            .unwrap();
    }
}
