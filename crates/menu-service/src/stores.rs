//! The store handles injected into every manager.

use std::sync::Arc;

use menu_db::{CategoryStore, Database, ItemStore, SubcategoryStore, TransactionCoordinator};

/// Shared store handles. Cloning is cheap.
#[derive(Clone)]
pub struct CatalogStores {
    pub categories: Arc<dyn CategoryStore>,
    pub subcategories: Arc<dyn SubcategoryStore>,
    pub items: Arc<dyn ItemStore>,
    pub coordinator: Arc<dyn TransactionCoordinator>,
}

impl CatalogStores {
    /// SQLite stores sharing `db`'s pool.
    pub fn sqlite(db: &Database) -> Self {
        CatalogStores {
            categories: Arc::new(db.categories()),
            subcategories: Arc::new(db.subcategories()),
            items: Arc::new(db.items()),
            coordinator: Arc::new(db.coordinator()),
        }
    }
}

impl std::fmt::Debug for CatalogStores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStores").finish_non_exhaustive()
    }
}
