//! # Subcategory Manager
//!
//! ## Creating a Subcategory
//! ```text
//! create(categoryId, input)
//!    │
//!    ├─ 1. category exists? ───────────────────► NotFound
//!    ├─ 2. SubcategoryDraft::new(input)
//!    │       invalid field ───────────────────► Validation
//!    └─ 3. UnitOfWork::create_subcategory
//!            read category tax under the write lock
//!            taxApplicability / tax omitted ──► copied from it (snapshot)
//!            insert row + append to category.subcategories
//!            any failure ─────────────────────► TransactionFailure, nothing written
//! ```

use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::lookup;
use crate::stores::CatalogStores;
use menu_core::{
    Item, NewSubcategory, Subcategory, SubcategoryChanges, SubcategoryDraft, SubcategoryPatch,
    SubcategoryView,
};
use menu_db::{EntityStore, SubcategoryStore, UnitOfWork};

#[derive(Debug, Clone)]
pub struct SubcategoryManager {
    stores: CatalogStores,
}

impl SubcategoryManager {
    pub fn new(stores: CatalogStores) -> Self {
        SubcategoryManager { stores }
    }

    /// Creates a subcategory under `category_id` and appends it to the
    /// category's list in one transaction.
    pub async fn create(
        &self,
        category_id: &str,
        input: NewSubcategory,
    ) -> CatalogResult<Subcategory> {
        let category_id = lookup::canonical_id(category_id)
            .ok_or_else(|| CatalogError::not_found("Category", category_id))?;
        if self.stores.categories.find_by_id(&category_id).await?.is_none() {
            return Err(CatalogError::not_found("Category", &category_id));
        }

        let draft = SubcategoryDraft::new(input, category_id.as_str(), Utc::now()).inspect_err(
            |e| {
                warn!(category_id = %category_id, error = %e, "Rejected subcategory create");
            },
        )?;
        let id = draft.id.clone();

        self.stores
            .coordinator
            .execute(UnitOfWork::create_subcategory(draft))
            .await?;

        let subcategory = self
            .stores
            .subcategories
            .find_by_id(&id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Subcategory", &id))?;

        info!(
            id = %subcategory.id,
            category_id = %category_id,
            tax_applicability = subcategory.tax_applicability,
            tax = subcategory.tax,
            "Subcategory created"
        );
        Ok(subcategory)
    }

    /// Every subcategory with its items resolved.
    pub async fn get_all(&self) -> CatalogResult<Vec<SubcategoryView>> {
        let subcategories = self.stores.subcategories.list().await?;
        self.resolve_items(subcategories).await
    }

    /// Subcategories whose parent is `category_id`. Empty, not an error,
    /// when there are none or the category does not exist.
    pub async fn get_by_category(&self, category_id: &str) -> CatalogResult<Vec<SubcategoryView>> {
        let Some(category_id) = lookup::canonical_id(category_id) else {
            return Ok(Vec::new());
        };

        let subcategories = self.stores.subcategories.list_by_category(&category_id).await?;
        self.resolve_items(subcategories).await
    }

    pub async fn get_by_id_or_name(&self, token: &str) -> CatalogResult<SubcategoryView> {
        let subcategory: Subcategory =
            lookup::resolve(&*self.stores.subcategories, "Subcategory", token).await?;

        let items = self.stores.items.find_many(&subcategory.items).await?;
        Ok(SubcategoryView::resolve(subcategory, items))
    }

    /// Writes the provided fields. A patch naming a parent is rejected.
    pub async fn edit(&self, id: &str, patch: SubcategoryPatch) -> CatalogResult<Subcategory> {
        let id =
            lookup::canonical_id(id).ok_or_else(|| CatalogError::not_found("Subcategory", id))?;

        let changes = SubcategoryChanges::try_from(patch).inspect_err(|e| {
            warn!(id = %id, error = %e, "Rejected subcategory edit");
        })?;

        let subcategory = self
            .stores
            .subcategories
            .update(&id, &changes, Utc::now())
            .await?;

        info!(id = %subcategory.id, "Subcategory updated");
        Ok(subcategory)
    }

    async fn resolve_items(
        &self,
        subcategories: Vec<Subcategory>,
    ) -> CatalogResult<Vec<SubcategoryView>> {
        let item_ids: Vec<String> = subcategories
            .iter()
            .flat_map(|s| s.items.iter().cloned())
            .collect();

        let mut items: HashMap<String, Item> = self
            .stores
            .items
            .find_many(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect();

        Ok(subcategories
            .into_iter()
            .map(|sub| {
                let its = sub.items.iter().filter_map(|id| items.remove(id)).collect();
                SubcategoryView::resolve(sub, its)
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::{fakes, CategoryManager};
    use async_trait::async_trait;
    use menu_core::{Category, CategoryChanges, CategoryPatch, NewCategory, ValidationError};
    use menu_db::{CategoryStore, DbResult, TransactionCoordinator};
    use std::sync::Arc;

    /// Commits a category edit right before forwarding each unit.
    struct EditFirst {
        stores: CatalogStores,
        category_id: String,
        changes: CategoryChanges,
    }

    #[async_trait]
    impl TransactionCoordinator for EditFirst {
        async fn execute(&self, unit: UnitOfWork) -> DbResult<()> {
            self.stores
                .categories
                .update(&self.category_id, &self.changes, Utc::now())
                .await?;
            self.stores.coordinator.execute(unit).await
        }
    }

    async fn setup() -> (menu_db::Database, CatalogStores, Category) {
        let (db, stores) = fakes::sqlite().await;
        let category = CategoryManager::new(stores.clone())
            .create(NewCategory {
                name: "Beverages".to_string(),
                tax_applicability: Some(true),
                tax: Some(5.0),
                ..Default::default()
            })
            .await
            .unwrap();
        (db, stores, category)
    }

    fn hot_drinks() -> NewSubcategory {
        NewSubcategory {
            name: "Hot Drinks".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_inherits_tax_and_links_parent() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(stores.clone());

        let sub = manager.create(&category.id, hot_drinks()).await.unwrap();
        assert!(sub.tax_applicability);
        assert_eq!(sub.tax, 5.0);
        assert_eq!(sub.category, category.id);

        let parent = stores.categories.find_by_id(&category.id).await.unwrap().unwrap();
        assert_eq!(parent.subcategories, vec![sub.id]);
    }

    #[tokio::test]
    async fn test_explicit_tax_overrides_inheritance() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(stores);

        let sub = manager
            .create(
                &category.id,
                NewSubcategory {
                    name: "Juices".to_string(),
                    tax_applicability: Some(false),
                    tax: Some(0.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!sub.tax_applicability);
        assert_eq!(sub.tax, 0.0);
    }

    #[tokio::test]
    async fn test_inheritance_is_a_snapshot() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(stores.clone());
        let sub = manager.create(&category.id, hot_drinks()).await.unwrap();

        CategoryManager::new(stores)
            .edit(
                &category.id,
                CategoryPatch {
                    tax: Some(12.0),
                    tax_applicability: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = manager.get_by_id_or_name(&sub.id).await.unwrap();
        assert_eq!(stored.tax, 5.0);
        assert!(stored.tax_applicability);
    }

    #[tokio::test]
    async fn test_missing_category_is_not_found() {
        let (_db, stores, _category) = setup().await;
        let counter = fakes::CountingCoordinator::forwarding(stores.coordinator.clone());
        let manager = SubcategoryManager::new(fakes::with_coordinator(&stores, counter.clone()));

        let err = manager
            .create("00000000-0000-4000-8000-000000000000", hot_drinks())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_coordinator() {
        let (_db, stores, category) = setup().await;
        let counter = fakes::CountingCoordinator::forwarding(stores.coordinator.clone());
        let manager = SubcategoryManager::new(fakes::with_coordinator(&stores, counter.clone()));

        let blank = NewSubcategory {
            name: "   ".to_string(),
            ..Default::default()
        };
        let err = manager.create(&category.id, blank).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(counter.count(), 0);
    }

    #[tokio::test]
    async fn test_aborted_unit_leaves_nothing_behind() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(fakes::with_coordinator(
            &stores,
            fakes::CountingCoordinator::failing(),
        ));

        let err = manager.create(&category.id, hot_drinks()).await.unwrap_err();
        assert!(matches!(err, CatalogError::TransactionFailure(_)));
        assert_eq!(err.status_code(), 500);

        assert!(stores.subcategories.list().await.unwrap().is_empty());
        let parent = stores.categories.find_by_id(&category.id).await.unwrap().unwrap();
        assert!(parent.subcategories.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_category() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(stores.clone());
        manager.create(&category.id, hot_drinks()).await.unwrap();

        assert_eq!(manager.get_by_category(&category.id).await.unwrap().len(), 1);

        let other = CategoryManager::new(stores)
            .create(NewCategory {
                name: "Food".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(manager.get_by_category(&other.id).await.unwrap().is_empty());
        assert!(manager.get_by_category("not-an-id").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_rejects_parent_change() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(stores);
        let sub = manager.create(&category.id, hot_drinks()).await.unwrap();

        let patch = SubcategoryPatch {
            category: Some("00000000-0000-4000-8000-000000000000".to_string()),
            ..Default::default()
        };
        let err = manager.edit(&sub.id, patch).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation(ValidationError::Immutable { .. })
        ));

        let renamed = manager
            .edit(
                &sub.id,
                SubcategoryPatch {
                    name: Some("Coffee & Tea".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Coffee & Tea");
        assert_eq!(renamed.category, category.id);
    }

    #[tokio::test]
    async fn test_inherits_tax_current_when_unit_runs() {
        let (_db, stores, category) = setup().await;
        let editor = Arc::new(EditFirst {
            stores: stores.clone(),
            category_id: category.id.clone(),
            changes: CategoryChanges {
                tax_applicability: Some(false),
                tax: Some(12.0),
                ..Default::default()
            },
        });
        let manager = SubcategoryManager::new(fakes::with_coordinator(&stores, editor));

        let sub = manager.create(&category.id, hot_drinks()).await.unwrap();
        assert!(!sub.tax_applicability);
        assert_eq!(sub.tax, 12.0);

        let stored = stores.subcategories.find_by_id(&sub.id).await.unwrap().unwrap();
        assert_eq!(stored, sub);
    }

    #[tokio::test]
    async fn test_edit_keeps_untouched_columns() {
        let (_db, stores, category) = setup().await;
        let manager = SubcategoryManager::new(stores);
        let sub = manager.create(&category.id, hot_drinks()).await.unwrap();

        let edited = manager
            .edit(
                &sub.id,
                SubcategoryPatch {
                    description: Some("Coffee and tea".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.description.as_deref(), Some("Coffee and tea"));
        assert_eq!(edited.name, "Hot Drinks");
        assert_eq!(edited.tax, 5.0);

        let err = manager
            .edit("00000000-0000-4000-8000-000000000000", SubcategoryPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
