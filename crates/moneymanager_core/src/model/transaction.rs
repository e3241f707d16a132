//! Transaction domain model.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored transaction record: a dated amount against one account.
///
/// Amounts are signed minor units (cents): positive for inflow, negative
/// for outflow. Currency is the owning account's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub memo: String,
    /// When the transaction happened, Unix epoch milliseconds.
    pub occurred_at: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; never earlier than `created_at`.
    pub updated_at: i64,
}

/// Creation draft accepted by `TransactionRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount_minor: i64,
    pub memo: String,
    pub occurred_at: i64,
}

impl NewTransaction {
    pub fn new(account_id: Uuid, amount_minor: i64, occurred_at: i64) -> Self {
        Self {
            account_id,
            category_id: None,
            amount_minor,
            memo: String::new(),
            occurred_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_minor == 0 {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(())
    }
}

impl Transaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_minor == 0 {
            return Err(ValidationError::ZeroAmount);
        }
        Ok(())
    }
}

/// Query options for listing transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionListQuery {
    /// Restrict to one account.
    pub account_id: Option<Uuid>,
    /// Restrict to one category.
    pub category_id: Option<Uuid>,
    /// Inclusive lower bound on `occurred_at`, epoch milliseconds.
    pub since: Option<i64>,
    /// Exclusive upper bound on `occurred_at`, epoch milliseconds.
    pub until: Option<i64>,
    pub limit: Option<u32>,
    pub offset: u32,
}
