//! # Category Repository
//!
//! Database operations for categories.
//!
//! ## Hydration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Loading a Category                                   │
//! │                                                                         │
//! │  SELECT ... FROM categories WHERE ...                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CategoryRow (scalar columns only)                                     │
//! │       │                                                                 │
//! │       ├── links::load(CategorySubcategories) ──► subcategories: [ids]  │
//! │       └── links::load(CategoryItems)         ──► items: [ids]          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Category                                                              │
//! │                                                                         │
//! │  Two list queries per call, however many categories were loaded.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::links::{self, ChildList};
use super::{CategoryStore, EntityStore};
use crate::error::{DbError, DbResult};
use menu_core::{Category, CategoryChanges, TaxType};

const SELECT_CATEGORY: &str = r#"
    SELECT id, name, image, description, tax_applicability, tax, tax_type,
           created_at, updated_at
    FROM categories
"#;

const RETURNING_CATEGORY: &str = " RETURNING id, name, image, description, tax_applicability, \
     tax, tax_type, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    image: Option<String>,
    description: Option<String>,
    tax_applicability: bool,
    tax: f64,
    tax_type: TaxType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self, subcategories: Vec<String>, items: Vec<String>) -> Category {
        Category {
            id: self.id,
            name: self.name,
            image: self.image,
            description: self.description,
            tax_applicability: self.tax_applicability,
            tax: self.tax,
            tax_type: self.tax_type,
            subcategories,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.categories();
///
/// repo.insert(&category).await?;
/// let found = repo.find_by_name("Beverages").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    /// Creates a new SqliteCategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCategoryRepository { pool }
    }

    /// Attaches both child lists to every row, preserving row order.
    async fn hydrate(&self, rows: Vec<CategoryRow>) -> DbResult<Vec<Category>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut subcategories =
            links::load(&self.pool, ChildList::CategorySubcategories, &ids).await?;
        let mut items = links::load(&self.pool, ChildList::CategoryItems, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let subs = subcategories.remove(&row.id).unwrap_or_default();
                let its = items.remove(&row.id).unwrap_or_default();
                row.into_category(subs, its)
            })
            .collect())
    }

    async fn hydrate_one(&self, row: Option<CategoryRow>) -> DbResult<Option<Category>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// A UNIQUE failure on `categories.name` carries the offending name.
fn name_conflict(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } if field == "categories.name" => {
            DbError::duplicate("name", name)
        }
        other => other,
    }
}

/// Reads a category's tax settings on a transaction's connection.
///
/// The read is an `UPDATE ... RETURNING` that touches `updated_at`, so the
/// write lock is held from the moment the values are read until the unit
/// commits. A category edit cannot land in between.
pub(crate) async fn claim_tax_settings(
    conn: &mut SqliteConnection,
    category_id: &str,
    now: DateTime<Utc>,
) -> DbResult<(bool, f64)> {
    let settings: Option<(bool, f64)> = sqlx::query_as(
        "UPDATE categories SET updated_at = ?2 WHERE id = ?1 RETURNING tax_applicability, tax",
    )
    .bind(category_id)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    settings.ok_or_else(|| DbError::not_found("Category", category_id))
}

#[async_trait]
impl EntityStore<Category> for SqliteCategoryRepository {
    async fn find_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        debug!(id = %id, "Finding category by id");

        let row = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.hydrate_one(row).await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        debug!(name = %name, "Finding category by name");

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORY} WHERE name = ?1 ORDER BY created_at, rowid LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate_one(row).await
    }

    async fn find_many(&self, ids: &[String]) -> DbResult<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CATEGORY);
        query.push(" WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows: Vec<CategoryRow> = query.build_query_as().fetch_all(&self.pool).await?;
        self.hydrate(rows).await
    }

    async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORY} ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed categories");
        self.hydrate(rows).await
    }
}

#[async_trait]
impl CategoryStore for SqliteCategoryRepository {
    async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (
                id, name, image, description, tax_applicability, tax, tax_type,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.image)
        .bind(&category.description)
        .bind(category.tax_applicability)
        .bind(category.tax)
        .bind(category.tax_type)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| name_conflict(e, &category.name))?;

        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        changes: &CategoryChanges,
        now: DateTime<Utc>,
    ) -> DbResult<Category> {
        debug!(id = %id, "Updating category");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE categories SET ");
        let mut set = query.separated(", ");
        set.push("updated_at = ").push_bind_unseparated(now);
        if let Some(name) = &changes.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(image) = &changes.image {
            set.push("image = ").push_bind_unseparated(image.clone());
        }
        if let Some(description) = &changes.description {
            set.push("description = ").push_bind_unseparated(description.clone());
        }
        if let Some(applicable) = changes.tax_applicability {
            set.push("tax_applicability = ").push_bind_unseparated(applicable);
        }
        if let Some(tax) = changes.tax {
            set.push("tax = ").push_bind_unseparated(tax);
        }
        if let Some(tax_type) = changes.tax_type {
            set.push("tax_type = ").push_bind_unseparated(tax_type);
        }
        query.push(" WHERE id = ").push_bind(id.to_string());
        query.push(RETURNING_CATEGORY);

        let row: Option<CategoryRow> = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| name_conflict(e, changes.name.as_deref().unwrap_or_default()))?;

        match self.hydrate_one(row).await? {
            Some(category) => Ok(category),
            None => Err(DbError::not_found("Category", id)),
        }
    }

    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
