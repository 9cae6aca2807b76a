//! # Item Repository
//!
//! Reads and updates for items.
//!
//! ## Parent Columns
//! ```text
//! items.category_id   items.subcategory_id   ItemParent
//! ─────────────────   ────────────────────   ──────────────────────
//! 'c-1'               NULL                   Category("c-1")
//! NULL                's-1'                  Subcategory("s-1")
//! both / neither                             CorruptRecord (CHECK forbids it)
//! ```
//!
//! ## Name Search
//! ```text
//! term is ASCII ──► WHERE lower(name) LIKE '%term%'      (SQLite folds ASCII)
//! otherwise     ──► SELECT id, name, fold both with to_lowercase() in Rust,
//!                   then load only the matching rows
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{EntityStore, ItemStore};
use crate::error::{DbError, DbResult};
use menu_core::{Item, ItemChanges, ItemParent};

const SELECT_ITEM: &str = r#"
    SELECT id, name, image, description, tax_applicability, tax, base_amount,
           discount, category_id, subcategory_id, created_at, updated_at
    FROM items
"#;

const RETURNING_ITEM: &str = " RETURNING id, name, image, description, tax_applicability, tax, \
     base_amount, discount, category_id, subcategory_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    image: Option<String>,
    description: Option<String>,
    tax_applicability: bool,
    tax: f64,
    base_amount: f64,
    discount: f64,
    category_id: Option<String>,
    subcategory_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let parent = match (row.category_id, row.subcategory_id) {
            (Some(category), None) => ItemParent::Category(category),
            (None, Some(subcategory)) => ItemParent::Subcategory(subcategory),
            (Some(_), Some(_)) => {
                return Err(DbError::CorruptRecord {
                    entity: "Item".to_string(),
                    id: row.id,
                    reason: "both parents set".to_string(),
                })
            }
            (None, None) => {
                return Err(DbError::CorruptRecord {
                    entity: "Item".to_string(),
                    id: row.id,
                    reason: "no parent set".to_string(),
                })
            }
        };

        Ok(Item {
            id: row.id,
            name: row.name,
            image: row.image,
            description: row.description,
            tax_applicability: row.tax_applicability,
            tax: row.tax,
            base_amount: row.base_amount,
            discount: row.discount,
            parent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_items(rows: Vec<ItemRow>) -> DbResult<Vec<Item>> {
    rows.into_iter().map(Item::try_from).collect()
}

/// Escapes `LIKE` wildcards so the term matches literally under `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Inserts the item row on a transaction's connection.
pub(crate) async fn insert(conn: &mut SqliteConnection, item: &Item) -> DbResult<()> {
    debug!(
        id = %item.id,
        parent = item.parent.kind(),
        parent_id = %item.parent.id(),
        "Inserting item"
    );

    sqlx::query(
        r#"
        INSERT INTO items (
            id, name, image, description, tax_applicability, tax, base_amount,
            discount, category_id, subcategory_id, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(&item.image)
    .bind(&item.description)
    .bind(item.tax_applicability)
    .bind(item.tax)
    .bind(item.base_amount)
    .bind(item.discount)
    .bind(item.parent.category_id())
    .bind(item.parent.subcategory_id())
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// SQLite-backed [`ItemStore`].
#[derive(Debug, Clone)]
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteItemRepository { pool }
    }

    async fn fetch_where(&self, clause: &str, bind: &str) -> DbResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_ITEM} WHERE {clause} ORDER BY created_at, rowid"
        ))
        .bind(bind)
        .fetch_all(&self.pool)
        .await?;

        into_items(rows)
    }

    /// Loads the rows with the given ids in creation order.
    async fn fetch_ids(&self, ids: &[String]) -> DbResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_ITEM);
        query.push(" WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY created_at, rowid");

        let rows: Vec<ItemRow> = query.build_query_as().fetch_all(&self.pool).await?;
        into_items(rows)
    }
}

#[async_trait]
impl EntityStore<Item> for SqliteItemRepository {
    async fn find_by_id(&self, id: &str) -> DbResult<Option<Item>> {
        debug!(id = %id, "Finding item by id");

        sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEM} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Item::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<Item>> {
        debug!(name = %name, "Finding item by name");

        sqlx::query_as::<_, ItemRow>(&format!(
            "{SELECT_ITEM} WHERE name = ?1 ORDER BY created_at, rowid LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .map(Item::try_from)
        .transpose()
    }

    async fn find_many(&self, ids: &[String]) -> DbResult<Vec<Item>> {
        self.fetch_ids(ids).await
    }

    async fn list(&self) -> DbResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEM} ORDER BY created_at, rowid"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed items");
        into_items(rows)
    }
}

#[async_trait]
impl ItemStore for SqliteItemRepository {
    async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Item>> {
        debug!(category_id = %category_id, "Listing items by category");
        self.fetch_where("category_id = ?1", category_id).await
    }

    async fn list_by_subcategory(&self, subcategory_id: &str) -> DbResult<Vec<Item>> {
        debug!(subcategory_id = %subcategory_id, "Listing items by subcategory");
        self.fetch_where("subcategory_id = ?1", subcategory_id).await
    }

    async fn search_by_name(&self, term: &str) -> DbResult<Vec<Item>> {
        let matches = if term.is_ascii() {
            let pattern = format!("%{}%", escape_like(&term.to_ascii_lowercase()));
            self.fetch_where("lower(name) LIKE ?1 ESCAPE '\\'", &pattern).await?
        } else {
            let needle = term.to_lowercase();
            let names: Vec<(String, String)> =
                sqlx::query_as("SELECT id, name FROM items ORDER BY created_at, rowid")
                    .fetch_all(&self.pool)
                    .await?;
            let ids: Vec<String> = names
                .into_iter()
                .filter(|(_, name)| name.to_lowercase().contains(&needle))
                .map(|(id, _)| id)
                .collect();
            self.fetch_ids(&ids).await?
        };

        debug!(term = %term, count = matches.len(), "Item name search");
        Ok(matches)
    }

    async fn update(&self, id: &str, changes: &ItemChanges, now: DateTime<Utc>) -> DbResult<Item> {
        debug!(id = %id, "Updating item");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE items SET ");
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
        if let Some(base_amount) = changes.base_amount {
            set.push("base_amount = ").push_bind_unseparated(base_amount);
        }
        if let Some(discount) = changes.discount {
            set.push("discount = ").push_bind_unseparated(discount);
        }
        query.push(" WHERE id = ").push_bind(id.to_string());
        query.push(RETURNING_ITEM);

        let row: Option<ItemRow> = query.build_query_as().fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Item::try_from(row),
            None => Err(DbError::not_found("Item", id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::CategoryStore;
    use crate::transaction::{TransactionCoordinator, UnitOfWork};
    use menu_core::{Category, NewCategory, NewItem};

    async fn seeded() -> (Database, Category) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = Category::create(
            NewCategory {
                name: "Beverages".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        db.categories().insert(&category).await.unwrap();
        (db, category)
    }

    async fn add_item(db: &Database, category_id: &str, name: &str, base: f64) -> Item {
        let item = Item::create(
            NewItem {
                name: name.to_string(),
                base_amount: Some(base),
                category_id: Some(category_id.to_string()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        db.coordinator()
            .execute(UnitOfWork::create_item(item.clone()))
            .await
            .unwrap();
        item
    }

    #[tokio::test]
    async fn test_item_round_trips_parent() {
        let (db, category) = seeded().await;
        let latte = add_item(&db, &category.id, "Latte", 4.0).await;

        let stored = db.items().find_by_id(&latte.id).await.unwrap().unwrap();
        assert_eq!(stored.parent, ItemParent::Category(category.id.clone()));
        assert_eq!(stored.base_amount, 4.0);
        assert_eq!(stored.total_amount(), 4.0);

        let parent = db.categories().find_by_id(&category.id).await.unwrap().unwrap();
        assert_eq!(parent.items, vec![latte.id]);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let (db, category) = seeded().await;
        add_item(&db, &category.id, "Latte", 4.0).await;
        add_item(&db, &category.id, "Iced LATTE", 4.5).await;
        add_item(&db, &category.id, "Mocha", 4.5).await;

        let found = db.items().search_by_name("latte").await.unwrap();
        let names: Vec<String> = found.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Latte", "Iced LATTE"]);

        assert!(db.items().search_by_name("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let (db, category) = seeded().await;
        add_item(&db, &category.id, "50% Off Tea", 2.0).await;
        add_item(&db, &category.id, "Green_Tea", 2.0).await;
        add_item(&db, &category.id, "Black Tea", 2.0).await;

        let percent = db.items().search_by_name("%").await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "50% Off Tea");

        let underscore = db.items().search_by_name("n_t").await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].name, "Green_Tea");
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let (db, category) = seeded().await;
        add_item(&db, &category.id, "Café Crème", 3.0).await;
        add_item(&db, &category.id, "Crème Brûlée", 5.0).await;
        add_item(&db, &category.id, "Cream Soda", 2.0).await;

        let found = db.items().search_by_name("CRÈME").await.unwrap();
        let names: Vec<String> = found.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Café Crème", "Crème Brûlée"]);
    }

    #[tokio::test]
    async fn test_search_keeps_surrounding_whitespace() {
        let (db, category) = seeded().await;
        add_item(&db, &category.id, "Latte", 4.0).await;
        add_item(&db, &category.id, "Iced Latte", 4.5).await;

        let found = db.items().search_by_name(" latte").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Iced Latte");
    }

    #[tokio::test]
    async fn test_list_by_parent() {
        let (db, category) = seeded().await;
        add_item(&db, &category.id, "Latte", 4.0).await;

        assert_eq!(db.items().list_by_category(&category.id).await.unwrap().len(), 1);
        assert!(db.items().list_by_subcategory(&category.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_amounts() {
        let (db, category) = seeded().await;
        let latte = add_item(&db, &category.id, "Latte", 4.0).await;

        let changes = ItemChanges {
            discount: Some(0.5),
            ..Default::default()
        };
        let updated = db.items().update(&latte.id, &changes, Utc::now()).await.unwrap();
        assert_eq!(updated.total_amount(), 3.5);
        assert_eq!(updated.parent, ItemParent::Category(category.id.clone()));

        let stored = db.items().find_by_id(&latte.id).await.unwrap().unwrap();
        assert_eq!(stored.base_amount, 4.0);
        assert_eq!(stored.discount, 0.5);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (db, _category) = seeded().await;
        let err = db
            .items()
            .update("missing", &ItemChanges::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_corrupt_row_is_reported() {
        let row = ItemRow {
            id: "x".to_string(),
            name: "Broken".to_string(),
            image: None,
            description: None,
            tax_applicability: false,
            tax: 0.0,
            base_amount: 1.0,
            discount: 0.0,
            category_id: None,
            subcategory_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = Item::try_from(row).unwrap_err();
        assert!(matches!(err, DbError::CorruptRecord { .. }));
    }
}
