//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `accounts` table with server-assigned identity and
//!   timestamps.
//!
//! # Invariants
//! - Create assigns a fresh v4 UUID and reads the stored row back, so the
//!   returned record carries the database-generated timestamps.
//! - Updates bump `updated_at`; it never moves before `created_at`.

use crate::db::DbHandle;
use crate::model::{Account, AccountKind, NewAccount};
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const ACCOUNT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    kind,
    currency_code,
    created_at,
    updated_at
FROM accounts";

/// Repository interface for account CRUD operations.
pub trait AccountRepository {
    fn create(&self, draft: &NewAccount) -> RepoResult<Account>;
    fn get(&self, id: Uuid) -> RepoResult<Option<Account>>;
    fn update(&self, account: &Account) -> RepoResult<()>;
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    fn list(&self) -> RepoResult<Vec<Account>>;
}

/// SQLite-backed account repository holding a non-owning database handle.
pub struct SqliteAccountRepository {
    db: Arc<DbHandle>,
}

impl SqliteAccountRepository {
    pub fn new(db: Arc<DbHandle>) -> Self {
        Self { db }
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn create(&self, draft: &NewAccount) -> RepoResult<Account> {
        draft.validate()?;
        let id = Uuid::new_v4();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (uuid, name, kind, currency_code)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    id.to_string(),
                    draft.name.as_str(),
                    account_kind_to_db(draft.kind),
                    draft.currency_code.as_str(),
                ],
            )?;
            // Read back so generated timestamps are returned as stored.
            fetch_account(conn, id)?.ok_or(RepoError::NotFound(id))
        })
    }

    fn get(&self, id: Uuid) -> RepoResult<Option<Account>> {
        self.db.with_conn(|conn| fetch_account(conn, id))
    }

    fn update(&self, account: &Account) -> RepoResult<()> {
        account.validate()?;

        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE accounts
                 SET
                    name = ?1,
                    kind = ?2,
                    currency_code = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?4;",
                params![
                    account.name.as_str(),
                    account_kind_to_db(account.kind),
                    account.currency_code.as_str(),
                    account.id.to_string(),
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound(account.id));
            }
            Ok(())
        })
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.db.with_conn(|conn| {
            let changed =
                conn.execute("DELETE FROM accounts WHERE uuid = ?1;", [id.to_string()])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }

    fn list(&self) -> RepoResult<Vec<Account>> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("{ACCOUNT_SELECT_SQL} ORDER BY name ASC, uuid ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut accounts = Vec::new();
            while let Some(row) = rows.next()? {
                accounts.push(parse_account_row(row)?);
            }
            Ok(accounts)
        })
    }
}

fn fetch_account(conn: &Connection, id: Uuid) -> RepoResult<Option<Account>> {
    let mut stmt = conn.prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_account_row(row)?));
    }
    Ok(None)
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid_column(&uuid_text, "accounts.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_account_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid account kind `{kind_text}` in accounts.kind"))
    })?;

    Ok(Account {
        id,
        name: row.get("name")?,
        kind,
        currency_code: row.get("currency_code")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn account_kind_to_db(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::Cash => "cash",
        AccountKind::Bank => "bank",
        AccountKind::Card => "card",
    }
}

fn parse_account_kind(value: &str) -> Option<AccountKind> {
    match value {
        "cash" => Some(AccountKind::Cash),
        "bank" => Some(AccountKind::Bank),
        "card" => Some(AccountKind::Card),
        _ => None,
    }
}
