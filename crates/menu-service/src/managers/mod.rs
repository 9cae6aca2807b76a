//! # Catalog Managers
//!
//! One manager per entity, layered like the hierarchy itself.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Managers                                        │
//! │                                                                         │
//! │  CategoryManager      root; standalone create, DuplicateName check     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SubcategoryManager   create = check Category ─► draft ─►             │
//! │       │               UnitOfWork { inherit tax + insert, link }        │
//! │       ▼                                                                 │
//! │  ItemManager          create = validate one parent ─► resolve it ─►    │
//! │                                UnitOfWork { insert, link }             │
//! │                                                                         │
//! │  All reads by token go through lookup::resolve.                        │
//! │  Edits write only the given columns and never touch parent linkage.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod item;
pub mod subcategory;

pub use category::CategoryManager;
pub use item::ItemManager;
pub use subcategory::SubcategoryManager;

#[cfg(test)]
pub(crate) mod fakes {
    //! Store doubles for failure injection.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use menu_db::{
        Database, DbConfig, DbError, DbResult, TransactionCoordinator, UnitOfWork,
    };

    use crate::stores::CatalogStores;

    pub async fn sqlite() -> (Database, CatalogStores) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stores = CatalogStores::sqlite(&db);
        (db, stores)
    }

    /// Counts units of work, then forwards them or fails them.
    pub struct CountingCoordinator {
        inner: Option<Arc<dyn TransactionCoordinator>>,
        pub executed: AtomicUsize,
    }

    impl CountingCoordinator {
        pub fn forwarding(inner: Arc<dyn TransactionCoordinator>) -> Arc<Self> {
            Arc::new(CountingCoordinator {
                inner: Some(inner),
                executed: AtomicUsize::new(0),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(CountingCoordinator {
                inner: None,
                executed: AtomicUsize::new(0),
            })
        }

        pub fn count(&self) -> usize {
            self.executed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TransactionCoordinator for CountingCoordinator {
        async fn execute(&self, unit: UnitOfWork) -> DbResult<()> {
            self.executed.fetch_add(1, Ordering::SeqCst);
            match &self.inner {
                Some(inner) => inner.execute(unit).await,
                None => Err(DbError::transaction("injected abort")),
            }
        }
    }

    /// `stores` with its coordinator swapped for `coordinator`.
    pub fn with_coordinator(
        stores: &CatalogStores,
        coordinator: Arc<dyn TransactionCoordinator>,
    ) -> CatalogStores {
        CatalogStores {
            coordinator,
            ..stores.clone()
        }
    }
}
