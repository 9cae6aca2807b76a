//! # Subcategory Repository
//!
//! Reads and updates for subcategories. Inserts go through a unit of work,
//! since a new subcategory must land in its category's list in the same
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::links::{self, ChildList};
use super::{EntityStore, SubcategoryStore};
use crate::error::{DbError, DbResult};
use menu_core::{Subcategory, SubcategoryChanges};

const SELECT_SUBCATEGORY: &str = r#"
    SELECT id, name, image, description, tax_applicability, tax, category_id,
           created_at, updated_at
    FROM subcategories
"#;

const RETURNING_SUBCATEGORY: &str = " RETURNING id, name, image, description, \
     tax_applicability, tax, category_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SubcategoryRow {
    id: String,
    name: String,
    image: Option<String>,
    description: Option<String>,
    tax_applicability: bool,
    tax: f64,
    category_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubcategoryRow {
    fn into_subcategory(self, items: Vec<String>) -> Subcategory {
        Subcategory {
            id: self.id,
            name: self.name,
            image: self.image,
            description: self.description,
            tax_applicability: self.tax_applicability,
            tax: self.tax,
            category: self.category_id,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Inserts the subcategory row on a transaction's connection.
///
/// Only the coordinator calls this, after filling the inherited tax fields
/// on the same connection. The list entry on the parent is a separate write
/// in the same unit.
pub(crate) async fn insert(conn: &mut SqliteConnection, subcategory: &Subcategory) -> DbResult<()> {
    debug!(
        id = %subcategory.id,
        category_id = %subcategory.category,
        "Inserting subcategory"
    );

    sqlx::query(
        r#"
        INSERT INTO subcategories (
            id, name, image, description, tax_applicability, tax, category_id,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&subcategory.id)
    .bind(&subcategory.name)
    .bind(&subcategory.image)
    .bind(&subcategory.description)
    .bind(subcategory.tax_applicability)
    .bind(subcategory.tax)
    .bind(&subcategory.category)
    .bind(subcategory.created_at)
    .bind(subcategory.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// SQLite-backed [`SubcategoryStore`].
#[derive(Debug, Clone)]
pub struct SqliteSubcategoryRepository {
    pool: SqlitePool,
}

impl SqliteSubcategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteSubcategoryRepository { pool }
    }

    async fn hydrate(&self, rows: Vec<SubcategoryRow>) -> DbResult<Vec<Subcategory>> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut items = links::load(&self.pool, ChildList::SubcategoryItems, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let its = items.remove(&row.id).unwrap_or_default();
                row.into_subcategory(its)
            })
            .collect())
    }

    async fn hydrate_one(&self, row: Option<SubcategoryRow>) -> DbResult<Option<Subcategory>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EntityStore<Subcategory> for SqliteSubcategoryRepository {
    async fn find_by_id(&self, id: &str) -> DbResult<Option<Subcategory>> {
        debug!(id = %id, "Finding subcategory by id");

        let row = sqlx::query_as::<_, SubcategoryRow>(&format!(
            "{SELECT_SUBCATEGORY} WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate_one(row).await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<Subcategory>> {
        debug!(name = %name, "Finding subcategory by name");

        let row = sqlx::query_as::<_, SubcategoryRow>(&format!(
            "{SELECT_SUBCATEGORY} WHERE name = ?1 ORDER BY created_at, rowid LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate_one(row).await
    }

    async fn find_many(&self, ids: &[String]) -> DbResult<Vec<Subcategory>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_SUBCATEGORY);
        query.push(" WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows: Vec<SubcategoryRow> = query.build_query_as().fetch_all(&self.pool).await?;
        self.hydrate(rows).await
    }

    async fn list(&self) -> DbResult<Vec<Subcategory>> {
        let rows = sqlx::query_as::<_, SubcategoryRow>(&format!(
            "{SELECT_SUBCATEGORY} ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed subcategories");
        self.hydrate(rows).await
    }
}

#[async_trait]
impl SubcategoryStore for SqliteSubcategoryRepository {
    async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Subcategory>> {
        debug!(category_id = %category_id, "Listing subcategories by category");

        let rows = sqlx::query_as::<_, SubcategoryRow>(&format!(
            "{SELECT_SUBCATEGORY} WHERE category_id = ?1 ORDER BY created_at, rowid"
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn update(
        &self,
        id: &str,
        changes: &SubcategoryChanges,
        now: DateTime<Utc>,
    ) -> DbResult<Subcategory> {
        debug!(id = %id, "Updating subcategory");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE subcategories SET ");
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
        query.push(" WHERE id = ").push_bind(id.to_string());
        query.push(RETURNING_SUBCATEGORY);

        let row: Option<SubcategoryRow> =
            query.build_query_as().fetch_optional(&self.pool).await?;

        match self.hydrate_one(row).await? {
            Some(subcategory) => Ok(subcategory),
            None => Err(DbError::not_found("Subcategory", id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
