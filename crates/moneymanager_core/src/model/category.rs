//! Category domain model.

use super::{validate_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flow direction a category classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// Stored category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds; never earlier than `created_at`.
    pub updated_at: i64,
}

/// Creation draft accepted by `CategoryRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

impl Category {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}
