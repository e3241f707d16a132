//! Transaction repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD and filtered listing over the `transactions` table.
//!
//! # Invariants
//! - Foreign keys are enforced: a transaction always references a live
//!   account; deleting a referenced account is rejected by the schema.
//! - List results are ordered newest-first by `occurred_at`, then by uuid
//!   for determinism.

use crate::db::DbHandle;
use crate::model::{NewTransaction, Transaction, TransactionListQuery};
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const TRANSACTION_SELECT_SQL: &str = "SELECT
    uuid,
    account_uuid,
    category_uuid,
    amount_minor,
    memo,
    occurred_at,
    created_at,
    updated_at
FROM transactions";

/// Repository interface for transaction CRUD and filtered listing.
pub trait TransactionRepository {
    fn create(&self, draft: &NewTransaction) -> RepoResult<Transaction>;
    fn get(&self, id: Uuid) -> RepoResult<Option<Transaction>>;
    fn update(&self, transaction: &Transaction) -> RepoResult<()>;
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    fn list(&self, query: &TransactionListQuery) -> RepoResult<Vec<Transaction>>;
}

/// SQLite-backed transaction repository holding a non-owning database handle.
pub struct SqliteTransactionRepository {
    db: Arc<DbHandle>,
}

impl SqliteTransactionRepository {
    pub fn new(db: Arc<DbHandle>) -> Self {
        Self { db }
    }
}

impl TransactionRepository for SqliteTransactionRepository {
    fn create(&self, draft: &NewTransaction) -> RepoResult<Transaction> {
        draft.validate()?;
        let id = Uuid::new_v4();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO transactions (
                    uuid,
                    account_uuid,
                    category_uuid,
                    amount_minor,
                    memo,
                    occurred_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    id.to_string(),
                    draft.account_id.to_string(),
                    draft.category_id.map(|c| c.to_string()),
                    draft.amount_minor,
                    draft.memo.as_str(),
                    draft.occurred_at,
                ],
            )?;
            fetch_transaction(conn, id)?.ok_or(RepoError::NotFound(id))
        })
    }

    fn get(&self, id: Uuid) -> RepoResult<Option<Transaction>> {
        self.db.with_conn(|conn| fetch_transaction(conn, id))
    }

    fn update(&self, transaction: &Transaction) -> RepoResult<()> {
        transaction.validate()?;

        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE transactions
                 SET
                    account_uuid = ?1,
                    category_uuid = ?2,
                    amount_minor = ?3,
                    memo = ?4,
                    occurred_at = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?6;",
                params![
                    transaction.account_id.to_string(),
                    transaction.category_id.map(|c| c.to_string()),
                    transaction.amount_minor,
                    transaction.memo.as_str(),
                    transaction.occurred_at,
                    transaction.id.to_string(),
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound(transaction.id));
            }
            Ok(())
        })
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.db.with_conn(|conn| {
            let changed =
                conn.execute("DELETE FROM transactions WHERE uuid = ?1;", [id.to_string()])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }

    fn list(&self, query: &TransactionListQuery) -> RepoResult<Vec<Transaction>> {
        let mut sql = format!("{TRANSACTION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(account_id) = query.account_id {
            sql.push_str(" AND account_uuid = ?");
            bind_values.push(Value::Text(account_id.to_string()));
        }

        if let Some(category_id) = query.category_id {
            sql.push_str(" AND category_uuid = ?");
            bind_values.push(Value::Text(category_id.to_string()));
        }

        if let Some(since) = query.since {
            sql.push_str(" AND occurred_at >= ?");
            bind_values.push(Value::Integer(since));
        }

        if let Some(until) = query.until {
            sql.push_str(" AND occurred_at < ?");
            bind_values.push(Value::Integer(until));
        }

        sql.push_str(" ORDER BY occurred_at DESC, uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values.iter()))?;
            let mut transactions = Vec::new();
            while let Some(row) = rows.next()? {
                transactions.push(parse_transaction_row(row)?);
            }
            Ok(transactions)
        })
    }
}

fn fetch_transaction(conn: &Connection, id: Uuid) -> RepoResult<Option<Transaction>> {
    let mut stmt = conn.prepare(&format!("{TRANSACTION_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_transaction_row(row)?));
    }
    Ok(None)
}

fn parse_transaction_row(row: &Row<'_>) -> RepoResult<Transaction> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid_column(&uuid_text, "transactions.uuid")?;

    let account_text: String = row.get("account_uuid")?;
    let account_id = parse_uuid_column(&account_text, "transactions.account_uuid")?;

    let category_id = match row.get::<_, Option<String>>("category_uuid")? {
        Some(value) => Some(parse_uuid_column(&value, "transactions.category_uuid")?),
        None => None,
    };

    Ok(Transaction {
        id,
        account_id,
        category_id,
        amount_minor: row.get("amount_minor")?,
        memo: row.get("memo")?,
        occurred_at: row.get("occurred_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
