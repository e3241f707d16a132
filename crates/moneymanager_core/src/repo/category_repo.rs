//! Category repository contract and SQLite implementation.

use crate::db::DbHandle;
use crate::model::{Category, CategoryKind, NewCategory};
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    kind,
    created_at,
    updated_at
FROM categories";

/// Repository interface for category CRUD operations.
pub trait CategoryRepository {
    fn create(&self, draft: &NewCategory) -> RepoResult<Category>;
    fn get(&self, id: Uuid) -> RepoResult<Option<Category>>;
    fn update(&self, category: &Category) -> RepoResult<()>;
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    fn list(&self, kind: Option<CategoryKind>) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository holding a non-owning database handle.
pub struct SqliteCategoryRepository {
    db: Arc<DbHandle>,
}

impl SqliteCategoryRepository {
    pub fn new(db: Arc<DbHandle>) -> Self {
        Self { db }
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn create(&self, draft: &NewCategory) -> RepoResult<Category> {
        draft.validate()?;
        let id = Uuid::new_v4();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO categories (uuid, name, kind) VALUES (?1, ?2, ?3);",
                params![
                    id.to_string(),
                    draft.name.as_str(),
                    category_kind_to_db(draft.kind),
                ],
            )?;
            fetch_category(conn, id)?.ok_or(RepoError::NotFound(id))
        })
    }

    fn get(&self, id: Uuid) -> RepoResult<Option<Category>> {
        self.db.with_conn(|conn| fetch_category(conn, id))
    }

    fn update(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE categories
                 SET
                    name = ?1,
                    kind = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?3;",
                params![
                    category.name.as_str(),
                    category_kind_to_db(category.kind),
                    category.id.to_string(),
                ],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound(category.id));
            }
            Ok(())
        })
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.db.with_conn(|conn| {
            let changed =
                conn.execute("DELETE FROM categories WHERE uuid = ?1;", [id.to_string()])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }

    fn list(&self, kind: Option<CategoryKind>) -> RepoResult<Vec<Category>> {
        self.db.with_conn(|conn| {
            let mut categories = Vec::new();
            match kind {
                Some(kind) => {
                    let mut stmt = conn.prepare(&format!(
                        "{CATEGORY_SELECT_SQL} WHERE kind = ?1 ORDER BY name ASC, uuid ASC;"
                    ))?;
                    let mut rows = stmt.query([category_kind_to_db(kind)])?;
                    while let Some(row) = rows.next()? {
                        categories.push(parse_category_row(row)?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "{CATEGORY_SELECT_SQL} ORDER BY name ASC, uuid ASC;"
                    ))?;
                    let mut rows = stmt.query([])?;
                    while let Some(row) = rows.next()? {
                        categories.push(parse_category_row(row)?);
                    }
                }
            }
            Ok(categories)
        })
    }
}

fn fetch_category(conn: &Connection, id: Uuid) -> RepoResult<Option<Category>> {
    let mut stmt = conn.prepare(&format!("{CATEGORY_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_category_row(row)?));
    }
    Ok(None)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid_column(&uuid_text, "categories.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_category_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category kind `{kind_text}` in categories.kind"
        ))
    })?;

    Ok(Category {
        id,
        name: row.get("name")?,
        kind,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn category_kind_to_db(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Income => "income",
        CategoryKind::Expense => "expense",
    }
}

fn parse_category_kind(value: &str) -> Option<CategoryKind> {
    match value {
        "income" => Some(CategoryKind::Income),
        "expense" => Some(CategoryKind::Expense),
        _ => None,
    }
}
