//! # menu-db: Database Layer for the Menu Catalog
//!
//! SQLite storage for categories, subcategories and items, using sqlx for
//! async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Menu Catalog Data Flow                           │
//! │                                                                         │
//! │  ItemManager::create (menu-service)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     menu-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (category.rs) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Subcategory   │    │ 0001_catalog │  │   │
//! │  │   │               │    │ Item          │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           ▲                                                    │   │
//! │  │           │            ┌───────────────────────────────────┐   │   │
//! │  │           └────────────│ SqliteCoordinator (UnitOfWork)    │   │   │
//! │  │                        └───────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (menu.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Store traits and their SQLite implementations
//! - [`transaction`] - Unit of work and the transaction coordinator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use menu_db::{Database, DbConfig, EntityStore};
//!
//! let db = Database::new(DbConfig::new("menu.db")).await?;
//!
//! let categories = db.categories().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::SqliteCategoryRepository;
pub use repository::item::SqliteItemRepository;
pub use repository::subcategory::SqliteSubcategoryRepository;
pub use repository::{CategoryStore, EntityStore, ItemStore, SubcategoryStore};
pub use transaction::{SqliteCoordinator, TransactionCoordinator, UnitOfWork, Write};
