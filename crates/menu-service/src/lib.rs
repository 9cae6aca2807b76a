//! # menu-service: Catalog Operations
//!
//! The managers callers use to build and query a Category → Subcategory →
//! Item menu. The transport layer hands in input records and path/query
//! tokens, and gets back views or a [`CatalogError`] with a status code.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Menu Catalog Layers                             │
//! │                                                                         │
//! │  transport (not in this workspace)                                     │
//! │       │  NewItem { ... } / "latte" / id                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  menu-service (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   Catalog ─► CategoryManager / SubcategoryManager / ItemManager │   │
//! │  │                  │                 │                            │   │
//! │  │            lookup::resolve     CatalogStores (Arc<dyn ...>)     │   │
//! │  └──────────────────┼─────────────────┼────────────────────────────┘   │
//! │                     ▼                 ▼                                 │
//! │              menu-core           menu-db                                │
//! │         (validation, views)   (SQLite, UnitOfWork)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use menu_service::{Catalog, CatalogConfig};
//!
//! let config = CatalogConfig::load()?;
//! let db = menu_db::Database::new(config.db_config()).await?;
//! let catalog = Catalog::sqlite(&db);
//!
//! let beverages = catalog.categories.create(NewCategory { .. }).await?;
//! let hits = catalog.items.search_by_name(Some("latte")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod lookup;
pub mod managers;
pub mod stores;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CatalogConfig, ConfigError};
pub use error::{ApiError, CatalogError, CatalogResult, ErrorCode};
pub use managers::{CategoryManager, ItemManager, SubcategoryManager};
pub use stores::CatalogStores;

use menu_db::Database;

/// The three managers over one set of stores.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub categories: CategoryManager,
    pub subcategories: SubcategoryManager,
    pub items: ItemManager,
}

impl Catalog {
    pub fn new(stores: CatalogStores) -> Self {
        Catalog {
            categories: CategoryManager::new(stores.clone()),
            subcategories: SubcategoryManager::new(stores.clone()),
            items: ItemManager::new(stores),
        }
    }

    /// Managers over the SQLite stores of `db`.
    pub fn sqlite(db: &Database) -> Self {
        Catalog::new(CatalogStores::sqlite(db))
    }
}
