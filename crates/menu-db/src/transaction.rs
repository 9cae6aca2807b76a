//! # Transaction Coordinator
//!
//! Runs a group of writes as one all-or-nothing unit.
//!
//! ## Creating a Child
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    UnitOfWork::create_item(item)                        │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. InsertItem            INSERT INTO items ...                       │
//! │    2. LinkItem              UPDATE <parent> SET updated_at              │
//! │                             INSERT INTO <parent>_items ...              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any step fails ──► ROLLBACK ──► DbError::TransactionFailed             │
//! │                                                                         │
//! │  Observers see either the item AND its list entry, or neither.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Creating a Subcategory
//! ```text
//! BEGIN
//!   1. InsertSubcategory(draft)
//!        UPDATE categories SET updated_at ... RETURNING tax_applicability, tax
//!        draft.inherit(parent values) ──► INSERT INTO subcategories ...
//!   2. LinkSubcategory            INSERT INTO category_subcategories ...
//! COMMIT
//! ```
//! The parent's tax settings are read under the write lock, so the copied
//! values are the ones the category has when the unit commits.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::links::{self, ChildList};
use crate::repository::{category, item, subcategory};
use menu_core::{Item, ItemParent, SubcategoryDraft};

// =============================================================================
// Unit of Work
// =============================================================================

/// A single write inside a unit of work.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Fills omitted tax fields from the parent, then inserts.
    InsertSubcategory(SubcategoryDraft),
    InsertItem(Item),
    /// Appends to the category's subcategory list.
    LinkSubcategory {
        category_id: String,
        subcategory_id: String,
    },
    /// Appends to the parent's item list.
    LinkItem { parent: ItemParent, item_id: String },
}

impl Write {
    fn label(&self) -> &'static str {
        match self {
            Write::InsertSubcategory(_) => "insert_subcategory",
            Write::InsertItem(_) => "insert_item",
            Write::LinkSubcategory { .. } => "link_subcategory",
            Write::LinkItem { .. } => "link_item",
        }
    }
}

/// Ordered list of writes applied atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOfWork {
    writes: Vec<Write>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a write. Writes run in the order they were added.
    pub fn then(mut self, write: Write) -> Self {
        self.writes.push(write);
        self
    }

    /// Insert the subcategory, then append it to its category's list.
    pub fn create_subcategory(draft: SubcategoryDraft) -> Self {
        let link = Write::LinkSubcategory {
            category_id: draft.category.clone(),
            subcategory_id: draft.id.clone(),
        };
        Self::new().then(Write::InsertSubcategory(draft)).then(link)
    }

    /// Insert the item, then append it to its parent's list.
    pub fn create_item(item: Item) -> Self {
        let link = Write::LinkItem {
            parent: item.parent.clone(),
            item_id: item.id.clone(),
        };
        Self::new().then(Write::InsertItem(item)).then(link)
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// Executes units of work atomically.
///
/// On success every write is visible; on failure none is, and the error is
/// always `DbError::TransactionFailed`.
#[async_trait]
pub trait TransactionCoordinator: Send + Sync {
    async fn execute(&self, unit: UnitOfWork) -> DbResult<()>;
}

/// Coordinator backed by a SQLite transaction.
#[derive(Debug, Clone)]
pub struct SqliteCoordinator {
    pool: SqlitePool,
}

impl SqliteCoordinator {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCoordinator { pool }
    }
}

async fn apply(conn: &mut SqliteConnection, write: &Write) -> DbResult<()> {
    match write {
        Write::InsertSubcategory(draft) => {
            let (tax_applicability, tax) =
                category::claim_tax_settings(conn, &draft.category, draft.created_at).await?;
            let sub = draft.clone().inherit(tax_applicability, tax);
            subcategory::insert(conn, &sub).await
        }
        Write::InsertItem(it) => item::insert(conn, it).await,
        Write::LinkSubcategory {
            category_id,
            subcategory_id,
        } => {
            links::append(
                conn,
                ChildList::CategorySubcategories,
                category_id,
                subcategory_id,
            )
            .await
        }
        Write::LinkItem { parent, item_id } => {
            links::append(conn, ChildList::for_item(parent), parent.id(), item_id).await
        }
    }
}

#[async_trait]
impl TransactionCoordinator for SqliteCoordinator {
    async fn execute(&self, unit: UnitOfWork) -> DbResult<()> {
        let writes = unit.into_writes();
        debug!(writes = writes.len(), "Beginning unit of work");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        for (step, write) in writes.iter().enumerate() {
            if let Err(err) = apply(&mut tx, write).await {
                warn!(
                    step,
                    write = write.label(),
                    error = %err,
                    "Unit of work aborted, rolling back"
                );
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                return Err(DbError::transaction(err));
            }
        }

        tx.commit().await.map_err(DbError::transaction)?;
        debug!(writes = writes.len(), "Unit of work committed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::{CategoryStore, EntityStore};
    use chrono::Utc;
    use menu_core::{
        Category, CategoryChanges, NewCategory, NewItem, NewSubcategory, Subcategory,
    };

    async fn seeded() -> (Database, Category) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = Category::create(
            NewCategory {
                name: "Food".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap();
        db.categories().insert(&category).await.unwrap();
        (db, category)
    }

    fn item_under(parent: ItemParent) -> Item {
        let (category_id, subcategory_id) = match parent {
            ItemParent::Category(id) => (Some(id), None),
            ItemParent::Subcategory(id) => (None, Some(id)),
        };
        Item::create(
            NewItem {
                name: "Bagel".to_string(),
                base_amount: Some(2.0),
                category_id,
                subcategory_id,
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn breakfast(category_id: &str) -> SubcategoryDraft {
        SubcategoryDraft::new(
            NewSubcategory {
                name: "Breakfast".to_string(),
                ..Default::default()
            },
            category_id,
            Utc::now(),
        )
        .unwrap()
    }

    async fn stored(db: &Database, id: &str) -> Subcategory {
        db.subcategories().find_by_id(id).await.unwrap().unwrap()
    }

    #[test]
    fn test_create_item_unit_order() {
        let item = item_under(ItemParent::Category("c".to_string()));
        let unit = UnitOfWork::create_item(item.clone());

        assert_eq!(unit.writes().len(), 2);
        assert!(matches!(unit.writes()[0], Write::InsertItem(_)));
        assert_eq!(
            unit.writes()[1],
            Write::LinkItem {
                parent: ItemParent::Category("c".to_string()),
                item_id: item.id,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_unit_commits() {
        let (db, _) = seeded().await;
        db.coordinator().execute(UnitOfWork::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_parent_rolls_back_insert() {
        let (db, _) = seeded().await;
        let orphan = item_under(ItemParent::Subcategory("missing".to_string()));

        let err = db
            .coordinator()
            .execute(UnitOfWork::create_item(orphan.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed(_)));

        assert!(db.items().find_by_id(&orphan.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_link_leaves_earlier_writes_undone() {
        let (db, category) = seeded().await;
        let draft = breakfast(&category.id);
        let id = draft.id.clone();

        // Insert succeeds, the second link to a missing category fails.
        let unit = UnitOfWork::create_subcategory(draft).then(Write::LinkSubcategory {
            category_id: "missing".to_string(),
            subcategory_id: id.clone(),
        });

        let err = db.coordinator().execute(unit).await.unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed(_)));

        assert!(db.subcategories().find_by_id(&id).await.unwrap().is_none());
        let parent = db.categories().find_by_id(&category.id).await.unwrap().unwrap();
        assert!(parent.subcategories.is_empty());
    }

    #[tokio::test]
    async fn test_subcategory_inherits_values_current_at_commit() {
        let (db, category) = seeded().await;
        let draft = breakfast(&category.id);
        let id = draft.id.clone();

        // The category is edited after the request was validated but before
        // the unit runs.
        let changes = CategoryChanges {
            tax_applicability: Some(true),
            tax: Some(12.0),
            ..Default::default()
        };
        db.categories()
            .update(&category.id, &changes, Utc::now())
            .await
            .unwrap();

        db.coordinator()
            .execute(UnitOfWork::create_subcategory(draft))
            .await
            .unwrap();

        let sub = stored(&db, &id).await;
        assert!(sub.tax_applicability);
        assert_eq!(sub.tax, 12.0);
        assert_eq!(sub.category, category.id);
    }

    #[tokio::test]
    async fn test_subcategory_under_missing_category_is_rolled_back() {
        let (db, _category) = seeded().await;
        let draft = breakfast("missing");
        let id = draft.id.clone();

        let err = db
            .coordinator()
            .execute(UnitOfWork::create_subcategory(draft))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed(_)));
        assert!(db.subcategories().find_by_id(&id).await.unwrap().is_none());
    }
}
