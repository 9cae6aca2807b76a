//! # Child Lists
//!
//! The ordered id lists a parent keeps of its children, stored as link rows.
//!
//! ## Why link rows
//! ```text
//! ❌ read list, push id, write list back
//!    two concurrent creates both read [a], both write [a, x] / [a, y]
//!    → one child lost from the list
//!
//! ✅ INSERT INTO category_subcategories (category_id, subcategory_id)
//!    each create adds its own row; the list is every row, in rowid order
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use menu_core::ItemParent;

/// One of the three child lists in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildList {
    CategorySubcategories,
    CategoryItems,
    SubcategoryItems,
}

impl ChildList {
    /// The list an item is appended to, given its parent.
    pub fn for_item(parent: &ItemParent) -> Self {
        match parent {
            ItemParent::Category(_) => ChildList::CategoryItems,
            ItemParent::Subcategory(_) => ChildList::SubcategoryItems,
        }
    }

    const fn table(self) -> &'static str {
        match self {
            ChildList::CategorySubcategories => "category_subcategories",
            ChildList::CategoryItems => "category_items",
            ChildList::SubcategoryItems => "subcategory_items",
        }
    }

    const fn parent_column(self) -> &'static str {
        match self {
            ChildList::CategorySubcategories | ChildList::CategoryItems => "category_id",
            ChildList::SubcategoryItems => "subcategory_id",
        }
    }

    const fn child_column(self) -> &'static str {
        match self {
            ChildList::CategorySubcategories => "subcategory_id",
            ChildList::CategoryItems | ChildList::SubcategoryItems => "item_id",
        }
    }

    const fn parent_table(self) -> &'static str {
        match self {
            ChildList::CategorySubcategories | ChildList::CategoryItems => "categories",
            ChildList::SubcategoryItems => "subcategories",
        }
    }

    /// Entity name of the parent, for errors.
    pub const fn parent_entity(self) -> &'static str {
        match self {
            ChildList::CategorySubcategories | ChildList::CategoryItems => "Category",
            ChildList::SubcategoryItems => "Subcategory",
        }
    }
}

/// Loads the lists of every parent in `parent_ids`, keyed by parent id.
///
/// Parents with an empty list are absent from the map.
pub async fn load(
    pool: &SqlitePool,
    list: ChildList,
    parent_ids: &[String],
) -> DbResult<HashMap<String, Vec<String>>> {
    let mut lists: HashMap<String, Vec<String>> = HashMap::new();
    if parent_ids.is_empty() {
        return Ok(lists);
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {}, {} FROM {} WHERE {} IN (",
        list.parent_column(),
        list.child_column(),
        list.table(),
        list.parent_column()
    ));
    let mut ids = query.separated(", ");
    for id in parent_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(") ORDER BY rowid");

    let rows: Vec<(String, String)> = query.build_query_as().fetch_all(pool).await?;

    for (parent, child) in rows {
        lists.entry(parent).or_default().push(child);
    }
    Ok(lists)
}

/// Appends `child_id` to `parent_id`'s list and touches the parent's `updated_at`.
///
/// Meant to run on a transaction's connection. A missing parent is
/// `DbError::NotFound`, which aborts the surrounding unit.
pub async fn append(
    conn: &mut SqliteConnection,
    list: ChildList,
    parent_id: &str,
    child_id: &str,
) -> DbResult<()> {
    debug!(list = list.table(), parent_id = %parent_id, child_id = %child_id, "Appending child");

    let touch = format!(
        "UPDATE {} SET updated_at = ?2 WHERE id = ?1",
        list.parent_table()
    );
    let touched = sqlx::query(&touch)
        .bind(parent_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

    if touched.rows_affected() == 0 {
        return Err(DbError::not_found(list.parent_entity(), parent_id));
    }

    let insert = format!(
        "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
        list.table(),
        list.parent_column(),
        list.child_column()
    );
    sqlx::query(&insert)
        .bind(parent_id)
        .bind(child_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
