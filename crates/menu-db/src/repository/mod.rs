//! # Repository Module
//!
//! Per-entity store interfaces and their SQLite implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Manager (menu-service)                                                │
//! │       │                                                                 │
//! │       │  Arc<dyn CategoryStore>                                         │
//! │       ▼                                                                 │
//! │  EntityStore<T>                       child inserts are NOT here:      │
//! │  ├── find_by_id / find_by_name        they only happen through a       │
//! │  └── find_many / list                 UnitOfWork (see transaction.rs)  │
//! │                                                                         │
//! │  CategoryStore / SubcategoryStore / ItemStore                          │
//! │  └── update(id, changes)    only the columns present in `changes`      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteCategoryRepository / ... ──► SQLite                              │
//! │                                                                         │
//! │  Managers only see the traits, so a different store can be swapped in  │
//! │  without touching them.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SqliteCategoryRepository`](category::SqliteCategoryRepository)
//! - [`SqliteSubcategoryRepository`](subcategory::SqliteSubcategoryRepository)
//! - [`SqliteItemRepository`](item::SqliteItemRepository)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DbResult;
use menu_core::{Category, CategoryChanges, Item, ItemChanges, Subcategory, SubcategoryChanges};

pub mod category;
pub mod item;
pub mod links;
pub mod subcategory;

/// Read operations shared by all three entity stores.
#[async_trait]
pub trait EntityStore<T>: Send + Sync {
    /// Finds a record by its canonical id.
    async fn find_by_id(&self, id: &str) -> DbResult<Option<T>>;

    /// Finds a record by exact name. With duplicate names the oldest wins.
    async fn find_by_name(&self, name: &str) -> DbResult<Option<T>>;

    /// Finds every record whose id is in `ids`, in no particular order.
    async fn find_many(&self, ids: &[String]) -> DbResult<Vec<T>>;

    /// Lists every record in creation order.
    async fn list(&self) -> DbResult<Vec<T>>;
}

/// Category store. Categories have no parent, so they are inserted directly.
#[async_trait]
pub trait CategoryStore: EntityStore<Category> {
    async fn insert(&self, category: &Category) -> DbResult<()>;

    /// Sets the columns present in `changes` plus `updated_at` in one
    /// statement and returns the stored row. Missing id is `NotFound`.
    async fn update(
        &self,
        id: &str,
        changes: &CategoryChanges,
        now: DateTime<Utc>,
    ) -> DbResult<Category>;

    async fn count(&self) -> DbResult<i64>;
}

#[async_trait]
pub trait SubcategoryStore: EntityStore<Subcategory> {
    /// Subcategories whose parent pointer is `category_id`.
    async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Subcategory>>;

    async fn update(
        &self,
        id: &str,
        changes: &SubcategoryChanges,
        now: DateTime<Utc>,
    ) -> DbResult<Subcategory>;
}

#[async_trait]
pub trait ItemStore: EntityStore<Item> {
    /// Items placed directly under `category_id`.
    async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Item>>;

    /// Items placed under `subcategory_id`.
    async fn list_by_subcategory(&self, subcategory_id: &str) -> DbResult<Vec<Item>>;

    /// Case-insensitive substring match on name.
    async fn search_by_name(&self, term: &str) -> DbResult<Vec<Item>>;

    async fn update(&self, id: &str, changes: &ItemChanges, now: DateTime<Utc>) -> DbResult<Item>;
}
